//! Break Statuses Dictionary

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "break_statuses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub code:      String,
    pub name:      String,
    pub sort:      Option<i16>,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::breaks::Entity")]
    Breaks,
}

impl Related<super::breaks::Entity> for Entity {
    fn to() -> RelationDef { Relation::Breaks.def() }
}

impl ActiveModelBehavior for ActiveModel {}
