//! Replacement Members Entity
//!
//! Participation of a group member in one shift. The four timestamps record
//! when the member came online, left for lunch, came back and went offline;
//! each is written once.

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue;
use serde::{Deserialize, Serialize};

use crate::sea_orm_active_enums::ReplacementStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "replacement_members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id:               i32,
    pub replacement_id:   i32,
    pub member_id:        i32,
    pub status:           ReplacementStatus,
    pub time_online:      Option<chrono::DateTime<chrono::Utc>>,
    pub time_offline:     Option<chrono::DateTime<chrono::Utc>>,
    pub time_break_start: Option<chrono::DateTime<chrono::Utc>>,
    pub time_break_end:   Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::replacements::Entity",
        from = "Column::ReplacementId",
        to = "super::replacements::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Replacement,
    #[sea_orm(
        belongs_to = "super::members::Entity",
        from = "Column::MemberId",
        to = "super::members::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Member,
    #[sea_orm(
        belongs_to = "super::replacement_statuses::Entity",
        from = "Column::Status",
        to = "super::replacement_statuses::Column::Code",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Status,
    #[sea_orm(has_one = "super::breaks::Entity")]
    Break,
}

impl Related<super::replacements::Entity> for Entity {
    fn to() -> RelationDef { Relation::Replacement.def() }
}

impl Related<super::members::Entity> for Entity {
    fn to() -> RelationDef { Relation::Member.def() }
}

impl Related<super::replacement_statuses::Entity> for Entity {
    fn to() -> RelationDef { Relation::Status.def() }
}

impl Related<super::breaks::Entity> for Entity {
    fn to() -> RelationDef { Relation::Break.def() }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    /// New participants always start offline.
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert {
            self.status = ActiveValue::Set(ReplacementStatus::Offline);
        }
        Ok(self)
    }
}
