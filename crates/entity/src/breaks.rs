//! Breaks Entity
//!
//! A booked lunch interval of one shift member. Bookings are 15-minute
//! aligned and lie inside the shift's lunch window.

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue;
use serde::{Deserialize, Serialize};

use crate::sea_orm_active_enums::BreakStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "breaks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id:             i32,
    pub replacement_id: i32,
    /// Replacement member that booked the break
    pub member_id:      i32,
    pub break_start:    chrono::NaiveTime,
    pub break_end:      chrono::NaiveTime,
    pub status:         BreakStatus,
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
        belongs_to = "super::replacement_members::Entity",
        from = "Column::MemberId",
        to = "super::replacement_members::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    ReplacementMember,
    #[sea_orm(
        belongs_to = "super::break_statuses::Entity",
        from = "Column::Status",
        to = "super::break_statuses::Column::Code",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Status,
}

impl Related<super::replacements::Entity> for Entity {
    fn to() -> RelationDef { Relation::Replacement.def() }
}

impl Related<super::replacement_members::Entity> for Entity {
    fn to() -> RelationDef { Relation::ReplacementMember.def() }
}

impl Related<super::break_statuses::Entity> for Entity {
    fn to() -> RelationDef { Relation::Status.def() }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    /// Fresh bookings start in the `created` state.
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert && self.status.is_not_set() {
            self.status = ActiveValue::Set(BreakStatus::Created);
        }
        Ok(self)
    }
}
