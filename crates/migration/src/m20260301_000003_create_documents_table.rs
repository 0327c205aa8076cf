//! Migration: Create documents table

use sea_orm_migration::prelude::*;

use crate::{
    m20260301_000001_create_clients_table::Clients,
    m20260301_000002_create_matters_table::Matters,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Documents::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Documents::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Documents::ClientId).uuid().not_null())
                    .col(ColumnDef::new(Documents::MatterId).uuid().null())
                    .col(ColumnDef::new(Documents::FileName).string().not_null())
                    .col(ColumnDef::new(Documents::ContentType).string().not_null())
                    .col(ColumnDef::new(Documents::SizeBytes).big_integer().not_null())
                    .col(ColumnDef::new(Documents::StoragePath).string().not_null())
                    .col(
                        ColumnDef::new(Documents::UploadedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_documents_client_id")
                            .from(Documents::Table, Documents::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_documents_matter_id")
                            .from(Documents::Table, Documents::MatterId)
                            .to(Matters::Table, Matters::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_documents_client_id")
                    .table(Documents::Table)
                    .col(Documents::ClientId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Documents::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(crate) enum Documents {
    Table,
    Id,
    ClientId,
    MatterId,
    FileName,
    ContentType,
    SizeBytes,
    StoragePath,
    UploadedAt,
}
