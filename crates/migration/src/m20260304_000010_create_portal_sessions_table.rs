//! Migration: Create portal sessions table

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
                    .table(PortalSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PortalSessions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PortalSessions::PortalUserId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PortalSessions::TokenHash)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PortalSessions::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PortalSessions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PortalSessions::LastActivityAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(PortalSessions::IpAddress).string().null())
                    .col(ColumnDef::new(PortalSessions::UserAgent).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_portal_sessions_portal_user_id")
                            .from(PortalSessions::Table, PortalSessions::PortalUserId)
                            .to(PortalUsers::Table, PortalUsers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_portal_sessions_portal_user_id")
                    .table(PortalSessions::Table)
                    .col(PortalSessions::PortalUserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PortalSessions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PortalSessions {
    Table,
    Id,
    PortalUserId,
    TokenHash,
    ExpiresAt,
    CreatedAt,
    LastActivityAt,
    IpAddress,
    UserAgent,
}
