//! Group Break Settings Entity
//!
//! Per-group defaults used when a shift is created without explicit values.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, Default)]
#[sea_orm(table_name = "group_break_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub group_id:           i32,
    pub min_active:         Option<i32>,
    pub break_start:        Option<chrono::NaiveTime>,
    pub break_end:          Option<chrono::NaiveTime>,
    /// Minutes
    pub break_max_duration: Option<i32>,
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
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef { Relation::Group.def() }
}

impl ActiveModelBehavior for ActiveModel {}
