//! # Authentication Primitives
//!
//! Building blocks for authenticating Breakroom users:
//! - Argon2id password hashing, verification and strength checks
//! - HS256 JWT access tokens

pub mod jwt;
pub mod password;

pub use jwt::{create_access_token, extract_bearer_token, validate_token, Claims, JwtConfig};
pub use password::{hash_password, validate_password_strength, verify_password, PasswordConfig};
pub use secrecy;
