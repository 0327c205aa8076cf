//! Migration: Create matters table

use sea_orm_migration::prelude::*;

use crate::m20260301_000001_create_clients_table::Clients;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Matters::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Matters::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Matters::ClientId).uuid().not_null())
                    .col(ColumnDef::new(Matters::Business).string().not_null())
                    .col(ColumnDef::new(Matters::Title).string().not_null())
                    .col(ColumnDef::new(Matters::Description).text().null())
                    .col(ColumnDef::new(Matters::Status).string().not_null())
                    .col(
                        ColumnDef::new(Matters::OpenedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Matters::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_matters_client_id")
                            .from(Matters::Table, Matters::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_matters_client_id")
                    .table(Matters::Table)
                    .col(Matters::ClientId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Matters::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(crate) enum Matters {
    Table,
    Id,
    ClientId,
    Business,
    Title,
    Description,
    Status,
    OpenedAt,
    CreatedAt,
}
