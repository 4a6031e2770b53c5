//! String-backed enums for columns that reference dictionary tables.
//!
//! The database keeps the codes in `positions`, `replacement_statuses` and
//! `break_statuses`; the columns are plain strings with foreign keys so new
//! display names and colours can be edited without a migration.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Employee position inside an organisation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum Position {
    #[sea_orm(string_value = "director")]
    Director,
    #[sea_orm(string_value = "manager")]
    Manager,
    #[sea_orm(string_value = "operator")]
    Operator,
}

impl Position {
    /// Directors and managers may run groups.
    pub fn can_manage_groups(self) -> bool { matches!(self, Position::Director | Position::Manager) }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::Director => write!(f, "director"),
            Position::Manager => write!(f, "manager"),
            Position::Operator => write!(f, "operator"),
        }
    }
}

/// Presence of a member during a shift.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ReplacementStatus {
    #[sea_orm(string_value = "offline")]
    Offline,
    #[sea_orm(string_value = "online")]
    Online,
    #[sea_orm(string_value = "break")]
    Break,
    #[sea_orm(string_value = "busy")]
    Busy,
}

impl std::fmt::Display for ReplacementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplacementStatus::Offline => write!(f, "offline"),
            ReplacementStatus::Online => write!(f, "online"),
            ReplacementStatus::Break => write!(f, "break"),
            ReplacementStatus::Busy => write!(f, "busy"),
        }
    }
}

/// Lifecycle of a booked lunch break.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum BreakStatus {
    #[sea_orm(string_value = "created")]
    Created,
    #[sea_orm(string_value = "started")]
    Started,
    #[sea_orm(string_value = "finished")]
    Finished,
}

impl std::fmt::Display for BreakStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BreakStatus::Created => write!(f, "created"),
            BreakStatus::Started => write!(f, "started"),
            BreakStatus::Finished => write!(f, "finished"),
        }
    }
}
