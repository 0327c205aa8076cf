//! Migration: Create staff invites table

use sea_orm_migration::prelude::*;

use crate::m20260302_000004_create_staff_accounts_table::StaffAccounts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StaffInvites::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StaffInvites::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StaffInvites::Email).string().not_null())
                    .col(ColumnDef::new(StaffInvites::Role).string().not_null())
                    .col(ColumnDef::new(StaffInvites::Businesses).json().not_null())
                    .col(ColumnDef::new(StaffInvites::Status).string().not_null())
                    .col(
                        ColumnDef::new(StaffInvites::TokenHash)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(StaffInvites::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StaffInvites::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(StaffInvites::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(StaffInvites::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_staff_invites_created_by")
                            .from(StaffInvites::Table, StaffInvites::CreatedBy)
                            .to(StaffAccounts::Table, StaffAccounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Pending-invite lookups by email
        manager
            .create_index(
                Index::create()
                    .name("idx_staff_invites_email_status")
                    .table(StaffInvites::Table)
                    .col(StaffInvites::Email)
                    .col(StaffInvites::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StaffInvites::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(crate) enum StaffInvites {
    Table,
    Id,
    Email,
    Role,
    Businesses,
    Status,
    TokenHash,
    ExpiresAt,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
