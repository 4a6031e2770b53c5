use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20261001_000001_create_dictionaries::{BreakStatuses, ReplacementStatuses},
    m20261001_000004_create_groups_table::{Groups, Members},
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Replacements::Table)
                    .if_not_exists()
                    .col(pk_auto(Replacements::Id))
                    .col(integer(Replacements::GroupId))
                    .col(date(Replacements::Date))
                    .col(time(Replacements::BreakStart))
                    .col(time(Replacements::BreakEnd))
                    .col(integer(Replacements::BreakMaxDuration))
                    .col(integer(Replacements::MinActive))
                    .col(timestamp_with_time_zone(Replacements::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_replacements_group_id")
                            .from(Replacements::Table, Replacements::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One shift per group and day
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_replacements_group_date")
                    .table(Replacements::Table)
                    .col(Replacements::GroupId)
                    .col(Replacements::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ReplacementMembers::Table)
                    .if_not_exists()
                    .col(pk_auto(ReplacementMembers::Id))
                    .col(integer(ReplacementMembers::ReplacementId))
                    .col(integer(ReplacementMembers::MemberId))
                    .col(string_len(ReplacementMembers::Status, 16).default("offline"))
                    .col(timestamp_with_time_zone_null(ReplacementMembers::TimeOnline))
                    .col(timestamp_with_time_zone_null(ReplacementMembers::TimeOffline))
                    .col(timestamp_with_time_zone_null(ReplacementMembers::TimeBreakStart))
                    .col(timestamp_with_time_zone_null(ReplacementMembers::TimeBreakEnd))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_replacement_members_replacement_id")
                            .from(ReplacementMembers::Table, ReplacementMembers::ReplacementId)
                            .to(Replacements::Table, Replacements::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_replacement_members_member_id")
                            .from(ReplacementMembers::Table, ReplacementMembers::MemberId)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_replacement_members_status")
                            .from(ReplacementMembers::Table, ReplacementMembers::Status)
                            .to(ReplacementStatuses::Table, ReplacementStatuses::Code)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_replacement_members_replacement_member")
                    .table(ReplacementMembers::Table)
                    .col(ReplacementMembers::ReplacementId)
                    .col(ReplacementMembers::MemberId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Breaks::Table)
                    .if_not_exists()
                    .col(pk_auto(Breaks::Id))
                    .col(integer(Breaks::ReplacementId))
                    .col(integer(Breaks::MemberId))
                    .col(time(Breaks::BreakStart))
                    .col(time(Breaks::BreakEnd))
                    .col(string_len(Breaks::Status, 16).default("created"))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_breaks_replacement_id")
                            .from(Breaks::Table, Breaks::ReplacementId)
                            .to(Replacements::Table, Replacements::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_breaks_member_id")
                            .from(Breaks::Table, Breaks::MemberId)
                            .to(ReplacementMembers::Table, ReplacementMembers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_breaks_status")
                            .from(Breaks::Table, Breaks::Status)
                            .to(BreakStatuses::Table, BreakStatuses::Code)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // One booking per shift member
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_breaks_replacement_member")
                    .table(Breaks::Table)
                    .col(Breaks::ReplacementId)
                    .col(Breaks::MemberId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Breaks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ReplacementMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Replacements::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Replacements {
    Table,
    Id,
    GroupId,
    Date,
    BreakStart,
    BreakEnd,
    BreakMaxDuration,
    MinActive,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum ReplacementMembers {
    Table,
    Id,
    ReplacementId,
    MemberId,
    Status,
    TimeOnline,
    TimeOffline,
    TimeBreakStart,
    TimeBreakEnd,
}

#[derive(DeriveIden)]
pub enum Breaks {
    Table,
    Id,
    ReplacementId,
    MemberId,
    BreakStart,
    BreakEnd,
    Status,
}
