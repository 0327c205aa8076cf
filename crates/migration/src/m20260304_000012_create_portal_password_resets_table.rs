//! Migration: Create portal password resets table

use sea_orm_migration::prelude::*;

use crate::m20260304_000009_create_portal_users_table::PortalUsers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PortalPasswordResets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PortalPasswordResets::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PortalPasswordResets::PortalUserId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PortalPasswordResets::TokenHash)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PortalPasswordResets::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PortalPasswordResets::UsedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PortalPasswordResets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_portal_password_resets_portal_user_id")
                            .from(
                                PortalPasswordResets::Table,
                                PortalPasswordResets::PortalUserId,
                            )
                            .to(PortalUsers::Table, PortalUsers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PortalPasswordResets::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PortalPasswordResets {
    Table,
    Id,
    PortalUserId,
    TokenHash,
    ExpiresAt,
    UsedAt,
    CreatedAt,
}
