//! # Organisation Data Transfer Objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::UserShort;

/// Request to create an organisation; the caller becomes its director
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateOrganisationRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Organisation name must be between 1 and 255 characters"
    ))]
    pub name: String,
}

/// Rename an organisation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateOrganisationRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Organisation name must be between 1 and 255 characters"
    ))]
    pub name: String,
}

/// Organisation as seen by one of its employees
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganisationResponse {
    pub id:           i32,
    pub name:         String,
    pub director:     UserShort,
    /// Number of employees
    pub pax:          u64,
    pub groups_count: u64,
    /// Caller is the director
    pub can_manage:   bool,
    pub created_at:   DateTime<Utc>,
}

/// Public organisation card, used when applying to join
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganisationSearchItem {
    pub id:       i32,
    pub name:     String,
    pub director: UserShort,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganisationShort {
    pub id:   i32,
    pub name: String,
}

/// Query parameters for the caller's organisations
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrganisationListQuery {
    pub search:     Option<String>,
    pub can_manage: Option<bool>,
    pub page:       Option<u64>,
    pub per_page:   Option<u64>,
}

/// Query parameters for the public organisation search
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrganisationSearchQuery {
    pub search:   Option<String>,
    pub page:     Option<u64>,
    pub per_page: Option<u64>,
}
