//! # JWT Token Management
//!
//! HS256 access tokens issued at login and checked by the API middleware.

use std::time::{Duration, SystemTime};

use cuid2::CuidConstructor;
use error::{AppError, Result};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Signing configuration for access tokens.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HMAC secret
    pub secret:             SecretString,
    /// Token lifetime in seconds
    pub expiration_seconds: u64,
    /// `iss` claim
    pub issuer:             String,
    /// `aud` claim
    pub audience:           String,
}

impl JwtConfig {
    /// Minimum secret length accepted by [`JwtConfig::new`].
    pub const MIN_SECRET_LENGTH: usize = 32;

    /// Build a configuration, rejecting short secrets.
    pub fn new(secret: impl Into<String>, expiration_seconds: u64, issuer: impl Into<String>, audience: impl Into<String>) -> Result<Self> {
        let secret = secret.into();
        if secret.len() < Self::MIN_SECRET_LENGTH {
            return Err(AppError::config(format!(
                "JWT secret must be at least {} bytes",
                Self::MIN_SECRET_LENGTH
            )));
        }
        if expiration_seconds == 0 {
            return Err(AppError::config("JWT expiration must be positive"));
        }

        Ok(Self {
            secret: SecretString::from(secret),
            expiration_seconds,
            issuer: issuer.into(),
            audience: audience.into(),
        })
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub:   String,
    /// User email
    pub email: String,
    /// Token issuer
    pub iss:   String,
    /// Token audience
    pub aud:   String,
    /// Expiration time (Unix timestamp)
    pub exp:   u64,
    /// Issued at (Unix timestamp)
    pub iat:   u64,
    /// Unique token ID
    pub jti:   String,
}

impl Claims {
    /// Numeric user id carried in `sub`.
    pub fn user_id(&self) -> Result<i32> { self.sub.parse().map_err(|_| AppError::JwtInvalidToken) }
}

/// Creates a new JWT access token for a user.
pub fn create_access_token(config: &JwtConfig, user_id: i32, email: &str) -> Result<String> {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_err(|e| AppError::internal(format!("Failed to get current time: {}", e)))?;
    let expiration = now + Duration::from_secs(config.expiration_seconds);

    let claims = Claims {
        sub:   user_id.to_string(),
        email: email.to_string(),
        iss:   config.issuer.clone(),
        aud:   config.audience.clone(),
        exp:   expiration.as_secs(),
        iat:   now.as_secs(),
        jti:   CuidConstructor::new().with_length(32).create_id(),
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.expose_secret().as_bytes()),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode token: {}", e)))
}

/// Validates a JWT token and returns the claims.
///
/// Expired tokens map to [`AppError::JwtExpired`], bad signatures to
/// [`AppError::JwtInvalidSignature`], everything else to [`AppError::JwtInvalidToken`].
pub fn validate_token(config: &JwtConfig, token: &str) -> Result<Claims> {
    let decoding_key = DecodingKey::from_secret(config.secret.expose_secret().as_bytes());

    let mut validation = Validation::default();
    validation.set_issuer(&[config.issuer.as_str()]);
    validation.set_audience(&[config.audience.as_str()]);
    validation.validate_exp = true;
    validation.leeway = 0;

    let data = jsonwebtoken::decode::<Claims>(token, &decoding_key, &validation)?;
    Ok(data.claims)
}

/// Extracts the Bearer token from the Authorization header value.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    let token = auth_header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig::new(
            "test-secret-key-that-is-at-least-32-bytes-long",
            3600,
            "breakroom",
            "breakroom-api",
        )
        .unwrap()
    }

    #[test]
    fn test_create_and_validate_token() {
        let config = config();
        let token = create_access_token(&config, 42, "operator@example.com").unwrap();

        let claims = validate_token(&config, &token).unwrap();
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.email, "operator@example.com");
        assert_eq!(claims.iss, "breakroom");
        assert_eq!(claims.aud, "breakroom-api");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_is_invalid_signature() {
        let token = create_access_token(&config(), 1, "a@example.com").unwrap();
        let other = JwtConfig::new(
            "another-secret-key-that-is-at-least-32-bytes",
            3600,
            "breakroom",
            "breakroom-api",
        )
        .unwrap();

        assert!(matches!(
            validate_token(&other, &token),
            Err(AppError::JwtInvalidSignature)
        ));
    }

    #[test]
    fn test_wrong_audience_is_rejected() {
        let token = create_access_token(&config(), 1, "a@example.com").unwrap();
        let mut other = config();
        other.audience = "somebody-else".to_string();

        assert!(matches!(
            validate_token(&other, &token),
            Err(AppError::JwtInvalidToken)
        ));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        assert!(matches!(
            validate_token(&config(), "not.a.token"),
            Err(AppError::JwtInvalidToken)
        ));
    }

    #[test]
    fn test_short_secret_is_rejected() {
        assert!(JwtConfig::new("short", 3600, "i", "a").is_err());
        assert!(JwtConfig::new("x".repeat(32), 0, "i", "a").is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert!(extract_bearer_token("Basic abc123").is_none());
        assert!(extract_bearer_token("Bearer ").is_none());
        assert!(extract_bearer_token("").is_none());
    }
}
