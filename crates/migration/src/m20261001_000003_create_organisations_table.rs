use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20261001_000001_create_dictionaries::Positions, m20261001_000002_create_users_table::Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Organisations::Table)
                    .if_not_exists()
                    .col(pk_auto(Organisations::Id))
                    .col(string_len(Organisations::Name, 255).unique_key())
                    .col(integer(Organisations::DirectorId))
                    .col(timestamp_with_time_zone(Organisations::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Organisations::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_organisations_director_id")
                            .from(Organisations::Table, Organisations::DirectorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(pk_auto(Employees::Id))
                    .col(integer(Employees::OrganisationId))
                    .col(integer(Employees::UserId))
                    .col(string_len(Employees::Position, 16).default("operator"))
                    .col(date(Employees::DateJoined))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employees_organisation_id")
                            .from(Employees::Table, Employees::OrganisationId)
                            .to(Organisations::Table, Organisations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employees_user_id")
                            .from(Employees::Table, Employees::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employees_position")
                            .from(Employees::Table, Employees::Position)
                            .to(Positions::Table, Positions::Code)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // A user works at most once in an organisation
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_employees_organisation_user")
                    .table(Employees::Table)
                    .col(Employees::OrganisationId)
                    .col(Employees::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_employees_user_id")
                    .table(Employees::Table)
                    .col(Employees::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Organisations::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Organisations {
    Table,
    Id,
    Name,
    DirectorId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Employees {
    Table,
    Id,
    OrganisationId,
    UserId,
    Position,
    DateJoined,
}
