use sea_orm_migration::{prelude::*, schema::*};

use crate::seeds;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Positions::Table)
                    .if_not_exists()
                    .col(string_len(Positions::Code, 16).primary_key())
                    .col(string_len(Positions::Name, 32))
                    .col(small_integer_null(Positions::Sort))
                    .col(boolean(Positions::IsActive).default(true))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ReplacementStatuses::Table)
                    .if_not_exists()
                    .col(string_len(ReplacementStatuses::Code, 16).primary_key())
                    .col(string_len(ReplacementStatuses::Name, 32))
                    .col(small_integer_null(ReplacementStatuses::Sort))
                    .col(boolean(ReplacementStatuses::IsActive).default(true))
                    .col(string_len(ReplacementStatuses::Color, 7).default("#000000"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BreakStatuses::Table)
                    .if_not_exists()
                    .col(string_len(BreakStatuses::Code, 16).primary_key())
                    .col(string_len(BreakStatuses::Name, 32))
                    .col(small_integer_null(BreakStatuses::Sort))
                    .col(boolean(BreakStatuses::IsActive).default(true))
                    .to_owned(),
            )
            .await?;

        // Every later table references these codes
        seeds::run_all_seeds(manager.get_connection())
            .await
            .map_err(|e| DbErr::Migration(e.to_string()))?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BreakStatuses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ReplacementStatuses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Positions::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Positions {
    Table,
    Code,
    Name,
    Sort,
    IsActive,
}

#[derive(DeriveIden)]
pub enum ReplacementStatuses {
    Table,
    Code,
    Name,
    Sort,
    IsActive,
    Color,
}

#[derive(DeriveIden)]
pub enum BreakStatuses {
    Table,
    Code,
    Name,
    Sort,
    IsActive,
}
