//! # Group Data Transfer Objects

use chrono::{DateTime, NaiveTime, Utc};
use entity::group_break_settings;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{employees::EmployeeShort, organisations::OrganisationShort};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateGroupRequest {
    pub organisation_id: i32,
    #[validate(length(min = 1, max = 255, message = "Group name must be between 1 and 255 characters"))]
    pub name:            String,
    /// Employee id, defaults to the director
    pub manager_id:      Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateGroupRequest {
    #[validate(length(min = 1, max = 255, message = "Group name must be between 1 and 255 characters"))]
    pub name:       Option<String>,
    pub manager_id: Option<i32>,
}

/// Default lunch parameters copied into new shifts
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, Validate)]
pub struct BreakSettings {
    #[validate(range(min = 0, max = 1000, message = "Minimum active must be between 0 and 1000"))]
    pub min_active:         Option<i32>,
    pub break_start:        Option<NaiveTime>,
    pub break_end:          Option<NaiveTime>,
    /// Minutes
    #[validate(range(min = 15, max = 480, message = "Break duration must be between 15 and 480 minutes"))]
    pub break_max_duration: Option<i32>,
}

impl From<&group_break_settings::Model> for BreakSettings {
    fn from(model: &group_break_settings::Model) -> Self {
        Self {
            min_active:         model.min_active,
            break_start:        model.break_start,
            break_end:          model.break_end,
            break_max_duration: model.break_max_duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupResponse {
    pub id:           i32,
    pub organisation: OrganisationShort,
    pub name:         String,
    pub manager:      EmployeeShort,
    /// Number of members
    pub pax:          u64,
    pub can_manage:   bool,
    pub is_member:    bool,
    pub created_at:   DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupDetailResponse {
    #[serde(flatten)]
    pub group:       GroupResponse,
    pub breaks_info: BreakSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupShort {
    pub id:   i32,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupListQuery {
    pub organisation: Option<i32>,
    /// Manager employee id
    pub manager:      Option<i32>,
    pub is_member:    Option<bool>,
    pub search:       Option<String>,
    pub page:         Option<u64>,
    pub per_page:     Option<u64>,
}
