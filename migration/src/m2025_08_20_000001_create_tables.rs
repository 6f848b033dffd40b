//! Migration to create the tables table.
//!
//! Holds one row per physical seating unit. The unique index on
//! `table_number` is the final arbiter for concurrent create/rename races;
//! the service-level pre-check only exists to produce a clean error message.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tables::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tables::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tables::TableNumber).text().not_null())
                    .col(ColumnDef::new(Tables::Capacity).integer().not_null())
                    .col(
                        ColumnDef::new(Tables::Location)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Tables::Status).text().not_null())
                    .col(
                        ColumnDef::new(Tables::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Tables::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Tables::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tables_table_number_unique")
                    .table(Tables::Table)
                    .col(Tables::TableNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tables::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Tables {
    Table,
    Id,
    TableNumber,
    Capacity,
    Location,
    Status,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
