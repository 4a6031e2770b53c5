//! Replacements Entity
//!
//! A shift: one working day of a group with its lunch window, the longest
//! allowed break and the number of members that must stay active.

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "replacements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id:                 i32,
    pub group_id:           i32,
    pub date:               chrono::NaiveDate,
    pub break_start:        chrono::NaiveTime,
    pub break_end:          chrono::NaiveTime,
    /// Minutes
    pub break_max_duration: i32,
    pub min_active:         i32,
    pub created_at:         chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Group,
    #[sea_orm(has_many = "super::replacement_members::Entity")]
    ReplacementMembers,
    #[sea_orm(has_many = "super::breaks::Entity")]
    Breaks,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef { Relation::Group.def() }
}

impl Related<super::replacement_members::Entity> for Entity {
    fn to() -> RelationDef { Relation::ReplacementMembers.def() }
}

impl Related<super::breaks::Entity> for Entity {
    fn to() -> RelationDef { Relation::Breaks.def() }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert && self.created_at.is_not_set() {
            self.created_at = ActiveValue::Set(chrono::Utc::now());
        }
        Ok(self)
    }
}
