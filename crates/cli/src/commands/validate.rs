//! # CLI Validate Command
//!
//! Loads every configuration source the server needs without binding a
//! port or touching the database.

use error::Result;
use migration::db::{load_config, DatabaseConfig};
use tracing::info;

use crate::config::load_jwt_config;

/// Checks database and token settings read through `lookup`.
///
/// # Errors
///
/// Returns the first configuration error found.
pub fn validate_with<F>(lookup: F) -> Result<DatabaseConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let database = load_config(&lookup)?;
    let jwt = load_jwt_config(&lookup)?;

    info!(
        target: "validate",
        database = %database.redacted_connection_string(),
        pool_size = %database.pool_size,
        jwt_issuer = %jwt.issuer,
        jwt_expiration_seconds = %jwt.expiration_seconds,
        "Configuration is valid"
    );
    Ok(database)
}

/// Validates the process environment.
pub fn validate() -> Result<()> {
    validate_with(|key| std::env::var(key).ok())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_secret_fails_validation() {
        let err = validate_with(|_| None).unwrap_err();
        assert!(err.message().contains("BREAKROOM_JWT_SECRET"));
    }

    #[test]
    fn test_complete_configuration_passes() {
        let database = validate_with(|key| {
            match key {
                "BREAKROOM_JWT_SECRET" => Some("a-long-enough-secret-for-breakroom-tokens".to_string()),
                "BREAKROOM_DATABASE_HOST" => Some("db.internal".to_string()),
                _ => None,
            }
        })
        .unwrap();
        assert_eq!(database.host, "db.internal");
    }

    #[test]
    fn test_bad_database_port_fails_validation() {
        let result = validate_with(|key| {
            match key {
                "BREAKROOM_JWT_SECRET" => Some("a-long-enough-secret-for-breakroom-tokens".to_string()),
                "BREAKROOM_DATABASE_PORT" => Some("eighty".to_string()),
                _ => None,
            }
        });
        assert!(result.is_err());
    }
}
