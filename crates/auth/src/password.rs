//! Password hashing and verification using Argon2id.
//!
//! Hashes are stored in the PHC-like layout
//! `$argon2id$v=19$m=<kib>,t=<iterations>,p=<lanes>$<salt_b64>$<hash_b64>`
//! so cost parameters can change without invalidating stored hashes.

use std::str::FromStr;

use argon2::{Algorithm, Argon2, Params, Version};
use base64::prelude::*;
use rand::{rng, RngCore};
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Hashing failed: {0}")]
    HashingFailed(String),

    #[error("Verification failed: password does not match")]
    VerificationFailed,

    #[error("Invalid hash format")]
    InvalidHashFormat,

    #[error("Base64 decoding failed: {0}")]
    DecodingFailed(#[from] base64::DecodeError),
}

/// Configuration for Argon2id password hashing.
#[derive(Debug, Clone)]
pub struct PasswordConfig {
    /// Memory cost in KiB (default: 15 MiB = 15360 KiB)
    pub memory_cost: u32,
    /// Number of iterations (default: 3)
    pub time_cost:   u32,
    /// Number of lanes (default: 2)
    pub parallelism: u32,
    /// Length of the generated hash (default: 32 bytes)
    pub hash_length: u32,
    /// Length of the salt (default: 16 bytes)
    pub salt_length: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_cost: 15360,
            time_cost:   3,
            parallelism: 2,
            hash_length: 32,
            salt_length: 16,
        }
    }
}

/// A stored hash split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StoredHash {
    memory_cost: u32,
    time_cost:   u32,
    parallelism: u32,
    salt:        Vec<u8>,
    hash:        Vec<u8>,
}

impl FromStr for StoredHash {
    type Err = PasswordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // ["", "argon2id", "v=19", "m=..,t=..,p=..", salt, hash]
        let parts: Vec<&str> = s.split('$').collect();
        let [empty, algorithm, version, params, salt, hash] = parts.as_slice()
        else {
            return Err(PasswordError::InvalidHashFormat);
        };
        if !empty.is_empty() || *algorithm != "argon2id" || *version != "v=19" {
            return Err(PasswordError::InvalidHashFormat);
        }

        let mut memory_cost = None;
        let mut time_cost = None;
        let mut parallelism = None;
        for pair in params.split(',') {
            let (key, value) = pair
                .split_once('=')
                .ok_or(PasswordError::InvalidHashFormat)?;
            let value: u32 = value
                .parse()
                .map_err(|_| PasswordError::InvalidHashFormat)?;
            match key {
                "m" => memory_cost = Some(value),
                "t" => time_cost = Some(value),
                "p" => parallelism = Some(value),
                _ => return Err(PasswordError::InvalidHashFormat),
            }
        }

        Ok(Self {
            memory_cost: memory_cost.ok_or(PasswordError::InvalidHashFormat)?,
            time_cost:   time_cost.ok_or(PasswordError::InvalidHashFormat)?,
            parallelism: parallelism.ok_or(PasswordError::InvalidHashFormat)?,
            salt:        BASE64_STANDARD.decode(salt)?,
            hash:        BASE64_STANDARD.decode(hash)?,
        })
    }
}

fn argon2_with(memory_cost: u32, time_cost: u32, parallelism: u32, output_len: usize) -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(memory_cost, time_cost, parallelism, Some(output_len))
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes a password using Argon2id.
///
/// # Example
///
/// ```
/// use auth::password::hash_password;
/// use secrecy::{ExposeSecret, SecretString};
///
/// let password = SecretString::from("LunchAt12:00".to_string());
/// let hash = hash_password(&password, None).unwrap();
/// assert!(hash.expose_secret().starts_with("$argon2id$v=19$"));
/// ```
pub fn hash_password(password: &SecretString, config: Option<PasswordConfig>) -> Result<SecretString, PasswordError> {
    let config = config.unwrap_or_default();

    let mut salt = vec![0u8; config.salt_length as usize];
    rng().fill_bytes(&mut salt);

    let argon2 = argon2_with(
        config.memory_cost,
        config.time_cost,
        config.parallelism,
        config.hash_length as usize,
    )?;

    let mut output = vec![0u8; config.hash_length as usize];
    argon2
        .hash_password_into(password.expose_secret().as_bytes(), &salt, &mut output)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    Ok(SecretString::from(format!(
        "$argon2id$v=19$m={},t={},p={}${}${}",
        config.memory_cost,
        config.time_cost,
        config.parallelism,
        BASE64_STANDARD.encode(&salt),
        BASE64_STANDARD.encode(&output)
    )))
}

/// Verifies a password against a stored hash in constant time.
pub fn verify_password(password: &SecretString, expected_hash: &str) -> Result<(), PasswordError> {
    let stored: StoredHash = expected_hash.parse()?;
    if stored.hash.is_empty() {
        return Err(PasswordError::InvalidHashFormat);
    }

    let argon2 = argon2_with(
        stored.memory_cost,
        stored.time_cost,
        stored.parallelism,
        stored.hash.len(),
    )?;

    let mut computed = vec![0u8; stored.hash.len()];
    argon2
        .hash_password_into(password.expose_secret().as_bytes(), &stored.salt, &mut computed)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    if computed.as_slice().ct_eq(&stored.hash).into() {
        Ok(())
    }
    else {
        Err(PasswordError::VerificationFailed)
    }
}

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum accepted password length.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Checks if a password is strong enough.
pub fn validate_password_strength(password: &str) -> Result<(), Vec<PasswordValidationError>> {
    let mut errors = Vec::new();
    let length = password.chars().count();

    if length < MIN_PASSWORD_LENGTH {
        errors.push(PasswordValidationError::TooShort);
    }
    if length > MAX_PASSWORD_LENGTH {
        errors.push(PasswordValidationError::TooLong);
    }
    if !password.chars().any(char::is_alphabetic) {
        errors.push(PasswordValidationError::MissingLetter);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push(PasswordValidationError::MissingDigit);
    }

    if errors.is_empty() {
        Ok(())
    }
    else {
        Err(errors)
    }
}

/// Errors for password validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordValidationError {
    #[error("Password must be at least 8 characters long")]
    TooShort,

    #[error("Password must be at most 128 characters long")]
    TooLong,

    #[error("Password must contain at least one letter")]
    MissingLetter,

    #[error("Password must contain at least one digit")]
    MissingDigit,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> Option<PasswordConfig> {
        Some(PasswordConfig {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
            ..Default::default()
        })
    }

    #[test]
    fn test_hash_and_verify() {
        let password = SecretString::from("LunchAt12:00".to_string());
        let hash = hash_password(&password, fast_config()).unwrap();
        let result = verify_password(&password, hash.expose_secret());
        assert!(result.is_ok(), "Verification failed: {:?}", result);
    }

    #[test]
    fn test_wrong_password_fails() {
        let password = SecretString::from("CorrectPassword1".to_string());
        let wrong_password = SecretString::from("WrongPassword1".to_string());
        let hash = hash_password(&password, fast_config()).unwrap();
        assert!(matches!(
            verify_password(&wrong_password, hash.expose_secret()),
            Err(PasswordError::VerificationFailed)
        ));
    }

    #[test]
    fn test_stored_parameters_are_honoured() {
        let password = SecretString::from("LunchAt12:00".to_string());
        let hash = hash_password(&password, fast_config()).unwrap();
        let stored: StoredHash = hash.expose_secret().parse().unwrap();
        assert_eq!(stored.memory_cost, 1024);
        assert_eq!(stored.time_cost, 1);
        assert_eq!(stored.parallelism, 1);
        assert_eq!(stored.salt.len(), 16);
        assert_eq!(stored.hash.len(), 32);
    }

    #[test]
    fn test_malformed_hashes_are_rejected() {
        let password = SecretString::from("LunchAt12:00".to_string());
        for bad in [
            "",
            "plain-text",
            "$argon2i$v=19$m=1024,t=1,p=1$c2FsdA==$aGFzaA==",
            "$argon2id$v=18$m=1024,t=1,p=1$c2FsdA==$aGFzaA==",
            "$argon2id$v=19$m=1024,t=1$c2FsdA==$aGFzaA==",
            "$argon2id$v=19$m=x,t=1,p=1$c2FsdA==$aGFzaA==",
        ] {
            assert!(
                matches!(verify_password(&password, bad), Err(PasswordError::InvalidHashFormat)),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_password_validation() {
        assert_eq!(
            validate_password_strength("abc"),
            Err(vec![
                PasswordValidationError::TooShort,
                PasswordValidationError::MissingDigit,
            ])
        );
        assert_eq!(
            validate_password_strength("12345678"),
            Err(vec![PasswordValidationError::MissingLetter])
        );
        assert!(validate_password_strength("lunchbreak15").is_ok());
    }
}
