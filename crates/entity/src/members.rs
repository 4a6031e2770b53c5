//! Members Entity
//!
//! An employee's membership in a group.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id:          i32,
    pub group_id:    i32,
    pub employee_id: i32,
    pub date_joined: chrono::NaiveDate,
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
    #[sea_orm(
        belongs_to = "super::employees::Entity",
        from = "Column::EmployeeId",
        to = "super::employees::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Employee,
    #[sea_orm(has_many = "super::replacement_members::Entity")]
    ReplacementMembers,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef { Relation::Group.def() }
}

impl Related<super::employees::Entity> for Entity {
    fn to() -> RelationDef { Relation::Employee.def() }
}

impl Related<super::replacement_members::Entity> for Entity {
    fn to() -> RelationDef { Relation::ReplacementMembers.def() }
}

impl ActiveModelBehavior for ActiveModel {}
