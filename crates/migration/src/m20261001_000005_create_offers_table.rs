use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20261001_000002_create_users_table::Users, m20261001_000003_create_organisations_table::Organisations};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Offers::Table)
                    .if_not_exists()
                    .col(pk_auto(Offers::Id))
                    .col(integer(Offers::OrganisationId))
                    .col(integer(Offers::UserId))
                    // NULL until the side decides
                    .col(boolean_null(Offers::OrgAccept))
                    .col(boolean_null(Offers::UserAccept))
                    .col(integer(Offers::CreatedBy))
                    .col(timestamp_with_time_zone(Offers::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Offers::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_offers_organisation_id")
                            .from(Offers::Table, Offers::OrganisationId)
                            .to(Organisations::Table, Organisations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_offers_user_id")
                            .from(Offers::Table, Offers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_offers_created_by")
                            .from(Offers::Table, Offers::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_offers_organisation_user")
                    .table(Offers::Table)
                    .col(Offers::OrganisationId)
                    .col(Offers::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Offers::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Offers {
    Table,
    Id,
    OrganisationId,
    UserId,
    OrgAccept,
    UserAccept,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
