//! Migration: Create portal activity log table

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
                    .table(PortalActivityLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PortalActivityLog::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PortalActivityLog::PortalUserId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PortalActivityLog::Action).string().not_null())
                    .col(ColumnDef::new(PortalActivityLog::Detail).json().null())
                    .col(ColumnDef::new(PortalActivityLog::IpAddress).string().null())
                    .col(
                        ColumnDef::new(PortalActivityLog::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_portal_activity_log_portal_user_id")
                            .from(PortalActivityLog::Table, PortalActivityLog::PortalUserId)
                            .to(PortalUsers::Table, PortalUsers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_portal_activity_log_portal_user_id")
                    .table(PortalActivityLog::Table)
                    .col(PortalActivityLog::PortalUserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PortalActivityLog::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PortalActivityLog {
    Table,
    Id,
    PortalUserId,
    Action,
    Detail,
    IpAddress,
    CreatedAt,
}
