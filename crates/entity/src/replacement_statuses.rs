//! Replacement Statuses Dictionary
//!
//! Presence statuses of shift members, each with the colour used on the schedule board.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "replacement_statuses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub code:      String,
    pub name:      String,
    pub sort:      Option<i16>,
    pub is_active: bool,
    pub color:     String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::replacement_members::Entity")]
    ReplacementMembers,
}

impl Related<super::replacement_members::Entity> for Entity {
    fn to() -> RelationDef { Relation::ReplacementMembers.def() }
}

impl ActiveModelBehavior for ActiveModel {}
