//! Organisations Entity
//!
//! A company with a single director. The director is also stored as an
//! employee with the `director` position.

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "organisations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id:          i32,
    #[sea_orm(unique)]
    pub name:        String,
    pub director_id: i32,
    pub created_at:  chrono::DateTime<chrono::Utc>,
    pub updated_at:  chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::DirectorId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Director,
    #[sea_orm(has_many = "super::employees::Entity")]
    Employees,
    #[sea_orm(has_many = "super::groups::Entity")]
    Groups,
    #[sea_orm(has_many = "super::offers::Entity")]
    Offers,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef { Relation::Director.def() }
}

impl Related<super::employees::Entity> for Entity {
    fn to() -> RelationDef { Relation::Employees.def() }
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef { Relation::Groups.def() }
}

impl Related<super::offers::Entity> for Entity {
    fn to() -> RelationDef { Relation::Offers.def() }
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
