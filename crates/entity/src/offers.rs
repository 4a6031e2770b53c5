//! Offers Entity
//!
//! A two-sided invitation between a user and an organisation. Either side may
//! open it; each side records its decision in its own nullable flag. When both
//! flags are `true` the user becomes an employee.

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "offers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id:              i32,
    pub organisation_id: i32,
    pub user_id:         i32,
    pub org_accept:      Option<bool>,
    pub user_accept:     Option<bool>,
    pub created_by:      i32,
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
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Creator,
}

impl Related<super::organisations::Entity> for Entity {
    fn to() -> RelationDef { Relation::Organisation.def() }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
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
    /// Offer opened by the user towards the organisation.
    pub fn is_application(&self) -> bool { self.created_by == self.user_id }

    /// Both sides said yes.
    pub fn is_accepted(&self) -> bool { self.org_accept == Some(true) && self.user_accept == Some(true) }

    /// Neither side has declined and the offer is not yet accepted.
    pub fn is_open(&self) -> bool {
        self.org_accept != Some(false) && self.user_accept != Some(false) && !self.is_accepted()
    }
}
