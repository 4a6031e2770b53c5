//! # Group Member Data Transfer Objects

use chrono::NaiveDate;
use entity::sea_orm_active_enums::Position;
use serde::{Deserialize, Serialize};

use super::UserShort;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddMemberRequest {
    pub employee_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberResponse {
    pub id:          i32,
    pub employee_id: i32,
    pub user:        UserShort,
    pub position:    Position,
    pub date_joined: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberSearchItem {
    pub id:        i32,
    pub full_name: String,
    pub email:     String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberListQuery {
    pub search:   Option<String>,
    pub page:     Option<u64>,
    pub per_page: Option<u64>,
}
