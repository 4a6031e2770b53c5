//! Users Entity
//!
//! Accounts that can log in. Corporate accounts are created by organisation
//! directors on behalf of their staff.

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id:                   i32,
    #[sea_orm(unique)]
    pub email:                String,
    #[serde(skip_serializing)]
    pub password_hash:        String,
    pub first_name:           String,
    pub last_name:            String,
    #[sea_orm(unique)]
    pub phone_number:         Option<String>,
    pub is_corporate_account: bool,
    pub is_superuser:         bool,
    pub is_active:            bool,
    pub created_at:           chrono::DateTime<chrono::Utc>,
    pub updated_at:           chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::profiles::Entity")]
    Profile,
    #[sea_orm(has_many = "super::employees::Entity")]
    Employees,
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef { Relation::Profile.def() }
}

impl Related<super::employees::Entity> for Entity {
    fn to() -> RelationDef { Relation::Employees.def() }
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

impl Model {
    /// First and last name joined by a space, trimmed.
    pub fn full_name(&self) -> String { format!("{} {}", self.first_name, self.last_name).trim().to_string() }
}
