//! # Runtime Configuration
//!
//! Settings the CLI reads from the environment on top of the database
//! configuration owned by the `migration` crate.

use std::net::SocketAddr;

use auth::JwtConfig;
use error::{AppError, Result};

/// Token lifetime when `BREAKROOM_JWT_EXPIRATION_SECONDS` is unset.
pub const DEFAULT_JWT_EXPIRATION_SECONDS: u64 = 3600;
pub const DEFAULT_JWT_ISSUER: &str = "breakroom";
pub const DEFAULT_JWT_AUDIENCE: &str = "breakroom-api";

/// Builds the JWT configuration through a lookup function.
///
/// `BREAKROOM_JWT_SECRET` is required and must be at least
/// [`JwtConfig::MIN_SECRET_LENGTH`] bytes long.
///
/// # Errors
///
/// Returns [`AppError::Config`] for a missing or short secret and for a
/// malformed expiration.
pub fn load_jwt_config<F>(lookup: F) -> Result<JwtConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let secret = lookup("BREAKROOM_JWT_SECRET")
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::config("BREAKROOM_JWT_SECRET is not set"))?;

    let expiration = match lookup("BREAKROOM_JWT_EXPIRATION_SECONDS") {
        Some(raw) => {
            raw.trim().parse::<u64>().map_err(|_| {
                AppError::config(format!(
                    "BREAKROOM_JWT_EXPIRATION_SECONDS has an invalid value: {}",
                    raw
                ))
            })?
        },
        None => DEFAULT_JWT_EXPIRATION_SECONDS,
    };

    JwtConfig::new(
        secret,
        expiration,
        lookup("BREAKROOM_JWT_ISSUER").unwrap_or_else(|| DEFAULT_JWT_ISSUER.to_owned()),
        lookup("BREAKROOM_JWT_AUDIENCE").unwrap_or_else(|| DEFAULT_JWT_AUDIENCE.to_owned()),
    )
}

/// JWT configuration from the process environment.
///
/// # Errors
///
/// See [`load_jwt_config`].
pub fn jwt_config_from_env() -> Result<JwtConfig> { load_jwt_config(|key| std::env::var(key).ok()) }

/// Parses a host and port into a SocketAddr.
///
/// Bare IPv6 hosts are bracketed before the port is appended.
pub fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, std::net::AddrParseError> {
    let addr_str = if host.contains(':') && !host.starts_with('[') {
        format!("[{}]:{}", host, port)
    }
    else {
        format!("{}:{}", host, port)
    };
    addr_str.parse()
}
