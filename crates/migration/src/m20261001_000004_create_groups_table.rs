use sea_orm_migration::{prelude::*, schema::*};

use crate::m20261001_000003_create_organisations_table::{Employees, Organisations};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Groups::Table)
                    .if_not_exists()
                    .col(pk_auto(Groups::Id))
                    .col(integer(Groups::OrganisationId))
                    .col(string_len(Groups::Name, 255))
                    .col(integer(Groups::ManagerId))
                    .col(timestamp_with_time_zone(Groups::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Groups::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_groups_organisation_id")
                            .from(Groups::Table, Groups::OrganisationId)
                            .to(Organisations::Table, Organisations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_groups_manager_id")
                            .from(Groups::Table, Groups::ManagerId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_groups_organisation_name")
                    .table(Groups::Table)
                    .col(Groups::OrganisationId)
                    .col(Groups::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GroupBreakSettings::Table)
                    .if_not_exists()
                    .col(integer(GroupBreakSettings::GroupId).primary_key())
                    .col(integer_null(GroupBreakSettings::MinActive))
                    .col(time_null(GroupBreakSettings::BreakStart))
                    .col(time_null(GroupBreakSettings::BreakEnd))
                    .col(integer_null(GroupBreakSettings::BreakMaxDuration))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_break_settings_group_id")
                            .from(GroupBreakSettings::Table, GroupBreakSettings::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Members::Table)
                    .if_not_exists()
                    .col(pk_auto(Members::Id))
                    .col(integer(Members::GroupId))
                    .col(integer(Members::EmployeeId))
                    .col(date(Members::DateJoined))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_members_group_id")
                            .from(Members::Table, Members::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_members_employee_id")
                            .from(Members::Table, Members::EmployeeId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_members_group_employee")
                    .table(Members::Table)
                    .col(Members::GroupId)
                    .col(Members::EmployeeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Members::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GroupBreakSettings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Groups::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Groups {
    Table,
    Id,
    OrganisationId,
    Name,
    ManagerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum GroupBreakSettings {
    Table,
    GroupId,
    MinActive,
    BreakStart,
    BreakEnd,
    BreakMaxDuration,
}

#[derive(DeriveIden)]
pub enum Members {
    Table,
    Id,
    GroupId,
    EmployeeId,
    DateJoined,
}
