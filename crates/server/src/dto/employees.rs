//! # Employee Data Transfer Objects

use chrono::NaiveDate;
use entity::sea_orm_active_enums::Position;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{DictItem, UserShort};

/// Director creates a corporate account for a new employee
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateEmployeeRequest {
    #[validate(length(min = 1, max = 150, message = "First name must be between 1 and 150 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 150, message = "Last name must be between 1 and 150 characters"))]
    pub last_name:  String,
    #[validate(email(message = "Invalid email format"))]
    pub email:      String,
    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub password:   String,
    /// Defaults to operator
    pub position:   Option<Position>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateEmployeeRequest {
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeUser {
    pub id:                   i32,
    pub full_name:            String,
    pub email:                String,
    pub is_corporate_account: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeResponse {
    pub id:          i32,
    pub user:        EmployeeUser,
    pub position:    DictItem,
    pub date_joined: NaiveDate,
}

/// Short shape for pickers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeSearchItem {
    pub id:        i32,
    pub full_name: String,
    pub email:     String,
    pub position:  Position,
}

/// Employee embedded in group responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeShort {
    pub id:   i32,
    pub user: UserShort,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeListQuery {
    pub search:               Option<String>,
    pub only_corporate:       Option<bool>,
    pub can_be_group_manager: Option<bool>,
    pub page:                 Option<u64>,
    pub per_page:             Option<u64>,
}
