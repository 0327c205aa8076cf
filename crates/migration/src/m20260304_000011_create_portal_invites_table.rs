//! Migration: Create portal invites table

use sea_orm_migration::prelude::*;

use crate::{
    m20260301_000001_create_clients_table::Clients,
    m20260302_000004_create_staff_accounts_table::StaffAccounts,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PortalInvites::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PortalInvites::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PortalInvites::ClientId).uuid().not_null())
                    .col(ColumnDef::new(PortalInvites::Email).string().not_null())
                    .col(
                        ColumnDef::new(PortalInvites::TokenHash)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PortalInvites::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PortalInvites::UsedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(PortalInvites::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(PortalInvites::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_portal_invites_client_id")
                            .from(PortalInvites::Table, PortalInvites::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_portal_invites_created_by")
                            .from(PortalInvites::Table, PortalInvites::CreatedBy)
                            .to(StaffAccounts::Table, StaffAccounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_portal_invites_client_id")
                    .table(PortalInvites::Table)
                    .col(PortalInvites::ClientId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PortalInvites::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PortalInvites {
    Table,
    Id,
    ClientId,
    Email,
    TokenHash,
    ExpiresAt,
    UsedAt,
    CreatedBy,
    CreatedAt,
}
