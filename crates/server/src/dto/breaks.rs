//! # Break Data Transfer Objects

use chrono::NaiveTime;
use entity::{breaks, replacements, sea_orm_active_enums::BreakStatus};
use serde::{Deserialize, Serialize};

use super::replacements::ReplacementShort;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateBreakRequest {
    pub break_start: NaiveTime,
    pub break_end:   NaiveTime,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateBreakRequest {
    pub break_start: Option<NaiveTime>,
    pub break_end:   Option<NaiveTime>,
    /// `break_start` or `break_end`
    pub status:      Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakResponse {
    pub id:          i32,
    pub replacement: ReplacementShort,
    pub break_start: NaiveTime,
    pub break_end:   NaiveTime,
    pub status:      BreakStatus,
}

impl BreakResponse {
    pub fn new(model: &breaks::Model, replacement: &replacements::Model) -> Self {
        Self {
            id:          model.id,
            replacement: replacement.into(),
            break_start: model.break_start,
            break_end:   model.break_end,
            status:      model.status,
        }
    }
}
