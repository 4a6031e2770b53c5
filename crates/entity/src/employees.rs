//! Employees Entity
//!
//! Membership of a user in an organisation with a position. A user appears at
//! most once per organisation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::sea_orm_active_enums::Position;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id:              i32,
    pub organisation_id: i32,
    pub user_id:         i32,
    pub position:        Position,
    pub date_joined:     chrono::NaiveDate,
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
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::positions::Entity",
        from = "Column::Position",
        to = "super::positions::Column::Code",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Position,
    #[sea_orm(has_many = "super::members::Entity")]
    Memberships,
    #[sea_orm(has_many = "super::groups::Entity")]
    ManagedGroups,
}

impl Related<super::organisations::Entity> for Entity {
    fn to() -> RelationDef { Relation::Organisation.def() }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl Related<super::positions::Entity> for Entity {
    fn to() -> RelationDef { Relation::Position.def() }
}

impl Related<super::members::Entity> for Entity {
    fn to() -> RelationDef { Relation::Memberships.def() }
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef { Relation::ManagedGroups.def() }
}

impl ActiveModelBehavior for ActiveModel {}
