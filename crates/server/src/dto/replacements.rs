//! # Shift Data Transfer Objects
//!
//! Shifts are called replacements on the wire.

use chrono::{NaiveDate, NaiveTime};
use entity::{replacement_members, replacements, sea_orm_active_enums::ReplacementStatus};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{groups::GroupShort, StatusItem};
use crate::scheduling::{Actions, BookingButton, ScheduleCell, ShiftOverrides};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateReplacementRequest {
    pub group_id:              i32,
    pub date:                  NaiveDate,
    pub break_start:           Option<NaiveTime>,
    pub break_end:             Option<NaiveTime>,
    /// Minutes
    #[validate(range(min = 15, max = 480, message = "Break duration must be between 15 and 480 minutes"))]
    pub break_max_duration:    Option<i32>,
    #[validate(range(min = 0, max = 1000, message = "Minimum active must be between 0 and 1000"))]
    pub min_active:            Option<i32>,
    /// Group member ids
    pub members:               Option<Vec<i32>>,
    #[serde(default)]
    pub all_group_members:     bool,
    /// Store the resulting parameters as the group's defaults
    #[serde(default)]
    pub remember_default_data: bool,
}

impl CreateReplacementRequest {
    pub fn overrides(&self) -> ShiftOverrides {
        ShiftOverrides {
            break_start:        self.break_start,
            break_end:          self.break_end,
            break_max_duration: self.break_max_duration,
            min_active:         self.min_active,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateReplacementRequest {
    pub date:                  Option<NaiveDate>,
    pub break_start:           Option<NaiveTime>,
    pub break_end:             Option<NaiveTime>,
    #[validate(range(min = 15, max = 480, message = "Break duration must be between 15 and 480 minutes"))]
    pub break_max_duration:    Option<i32>,
    #[validate(range(min = 0, max = 1000, message = "Minimum active must be between 0 and 1000"))]
    pub min_active:            Option<i32>,
    /// Replaces the roster when present and non-empty
    pub members:               Option<Vec<i32>>,
    #[serde(default)]
    pub all_group_members:     bool,
    #[serde(default)]
    pub remember_default_data: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplacementCategory {
    /// Today
    Active,
    Future,
    Archive,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplacementListQuery {
    pub group:    Option<i32>,
    pub category: Option<ReplacementCategory>,
    pub page:     Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplacementResponse {
    pub id:                 i32,
    pub group:              GroupShort,
    pub date:               NaiveDate,
    pub break_start:        NaiveTime,
    pub break_end:          NaiveTime,
    pub break_max_duration: i32,
    pub min_active:         i32,
}

impl ReplacementResponse {
    pub fn new(model: &replacements::Model, group: GroupShort) -> Self {
        Self {
            id: model.id,
            group,
            date: model.date,
            break_start: model.break_start,
            break_end: model.break_end,
            break_max_duration: model.break_max_duration,
            min_active: model.min_active,
        }
    }
}

/// Shift without its group, embedded in break responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplacementShort {
    pub id:                 i32,
    pub date:               NaiveDate,
    pub break_start:        NaiveTime,
    pub break_end:          NaiveTime,
    pub break_max_duration: i32,
    pub min_active:         i32,
}

impl From<&replacements::Model> for ReplacementShort {
    fn from(model: &replacements::Model) -> Self {
        Self {
            id:                 model.id,
            date:               model.date,
            break_start:        model.break_start,
            break_end:          model.break_end,
            break_max_duration: model.break_max_duration,
            min_active:         model.min_active,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplacementStats {
    pub members_count:   u64,
    pub breaks_count:    u64,
    pub members_online:  u64,
    pub members_offline: u64,
    pub members_busy:    u64,
    pub members_break:   u64,
}

impl ReplacementStats {
    pub fn collect(members: &[replacement_members::Model], breaks_count: u64) -> Self {
        let count = |status| members.iter().filter(|m| m.status == status).count() as u64;
        Self {
            members_count: members.len() as u64,
            breaks_count,
            members_online: count(ReplacementStatus::Online),
            members_offline: count(ReplacementStatus::Offline),
            members_busy: count(ReplacementStatus::Busy),
            members_break: count(ReplacementStatus::Break),
        }
    }
}

/// Display-formatted shift header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplacementGeneral {
    pub id:                 i32,
    pub group:              GroupShort,
    /// `dd.mm.yyyy`
    pub date:               String,
    /// `HH:MM`
    pub break_start:        String,
    pub break_end:          String,
    pub break_max_duration: i32,
    pub min_active:         i32,
}

/// The caller's own clock-in times as `HH:MM`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersonalStats {
    pub time_online:      Option<String>,
    pub time_break_start: Option<String>,
    pub time_break_end:   Option<String>,
    pub time_offline:     Option<String>,
    pub time_until_break: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakShort {
    pub id:          i32,
    /// `HH:MM`
    pub break_start: String,
    pub break_end:   String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplacementBreaks {
    pub info:   Option<BreakShort>,
    pub button: Option<BookingButton>,
}

/// One person on the shift roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShiftMemberItem {
    /// User id
    pub id:          i32,
    pub full_name:   String,
    pub email:       String,
    pub status:      StatusItem,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplacementDetailResponse {
    #[serde(flatten)]
    pub replacement:    ReplacementResponse,
    pub stats:          ReplacementStats,
    pub general:        ReplacementGeneral,
    pub personal_stats: Option<PersonalStats>,
    pub breaks:         ReplacementBreaks,
    pub actions:        Actions,
    pub members:        Vec<ShiftMemberItem>,
}

/// Timetable row
pub type ScheduleRow = Vec<ScheduleCell>;

/// The caller's presence on a shift
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShiftMemberResponse {
    pub id:     i32,
    pub status: StatusItem,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateShiftMemberRequest {
    pub status: ReplacementStatus,
}
