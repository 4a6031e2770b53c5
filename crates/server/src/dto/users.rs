//! # User Data Transfer Objects
//!
//! Request and response types for the caller's own account and user search.

use chrono::{DateTime, Utc};
use entity::{profiles, users};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Full account view of the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponse {
    pub id:                   i32,
    pub email:                String,
    pub first_name:           String,
    pub last_name:            String,
    pub full_name:            String,
    pub phone_number:         Option<String>,
    pub is_corporate_account: bool,
    pub profile:              ProfileResponse,
    pub created_at:           DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileResponse {
    pub telegram_id: Option<String>,
}

impl UserResponse {
    pub fn new(user: &users::Model, profile: Option<&profiles::Model>) -> Self {
        Self {
            id:                   user.id,
            email:                user.email.clone(),
            first_name:           user.first_name.clone(),
            last_name:            user.last_name.clone(),
            full_name:            user.full_name(),
            phone_number:         user.phone_number.clone(),
            is_corporate_account: user.is_corporate_account,
            profile:              ProfileResponse {
                telegram_id: profile.and_then(|p| p.telegram_id.clone()),
            },
            created_at:           user.created_at,
        }
    }
}

/// Partial update of the caller's account
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateMeRequest {
    #[validate(length(min = 1, max = 150, message = "First name must be between 1 and 150 characters"))]
    pub first_name:   Option<String>,
    #[validate(length(min = 1, max = 150, message = "Last name must be between 1 and 150 characters"))]
    pub last_name:    Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email:        Option<String>,
    #[validate(length(min = 5, max = 20, message = "Phone number must be between 5 and 20 characters"))]
    pub phone_number: Option<String>,
    #[validate(length(max = 20, message = "Telegram id must not exceed 20 characters"))]
    pub telegram_id:  Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Old password is required"))]
    pub old_password: String,
    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub new_password: String,
}

/// Query parameters for user search
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserSearchQuery {
    pub search:   Option<String>,
    pub page:     Option<u64>,
    pub per_page: Option<u64>,
}
