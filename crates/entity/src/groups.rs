//! Groups Entity
//!
//! A team inside an organisation, run by a manager who is one of the
//! organisation's employees. Shifts are scheduled per group.

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "groups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id:              i32,
    pub organisation_id: i32,
    pub name:            String,
    pub manager_id:      i32,
    pub created_at:      chrono::DateTime<chrono::Utc>,
    pub updated_at:      chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organisations::Entity",
        from = "Column::OrganisationId",
        to = "super::organisations::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Organisation,
    #[sea_orm(
        belongs_to = "super::employees::Entity",
        from = "Column::ManagerId",
        to = "super::employees::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Manager,
    #[sea_orm(has_many = "super::members::Entity")]
    Members,
    #[sea_orm(has_one = "super::group_break_settings::Entity")]
    BreakSettings,
    #[sea_orm(has_many = "super::replacements::Entity")]
    Replacements,
}

impl Related<super::organisations::Entity> for Entity {
    fn to() -> RelationDef { Relation::Organisation.def() }
}

impl Related<super::employees::Entity> for Entity {
    fn to() -> RelationDef { Relation::Manager.def() }
}

impl Related<super::members::Entity> for Entity {
    fn to() -> RelationDef { Relation::Members.def() }
}

impl Related<super::group_break_settings::Entity> for Entity {
    fn to() -> RelationDef { Relation::BreakSettings.def() }
}

impl Related<super::replacements::Entity> for Entity {
    fn to() -> RelationDef { Relation::Replacements.def() }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = chrono::Utc::now();
        if insert && self.created_at.is_not_set() {
            self.created_at = ActiveValue::Set(now);
        }
        self.updated_at = ActiveValue::Set(now);
        Ok(self)
    }
}
