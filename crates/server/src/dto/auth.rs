//! # Authentication Data Transfer Objects
//!
//! Request and response types for registration and login.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::users::UserResponse;

/// Request body for self registration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email:        String,
    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub password:     String,
    #[validate(length(min = 1, max = 150, message = "First name must be between 1 and 150 characters"))]
    pub first_name:   String,
    #[validate(length(min = 1, max = 150, message = "Last name must be between 1 and 150 characters"))]
    pub last_name:    String,
    #[validate(length(min = 5, max = 20, message = "Phone number must be between 5 and 20 characters"))]
    pub phone_number: Option<String>,
}

/// Request body for user login
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct LoginRequest {
    /// User's email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// User's password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponse {
    /// JWT access token for API requests
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type:   String,
    /// Token lifetime in seconds
    pub expires_in:   u64,
    pub user:         UserResponse,
}
