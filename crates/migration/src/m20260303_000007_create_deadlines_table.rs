//! Migration: Create deadlines table
//!
//! The unique index on (parent_deadline_id, due_date) is the storage
//! backstop against duplicate recurrence instances: two writers racing to
//! materialize the same occurrence cannot both commit.

use sea_orm_migration::prelude::*;

use crate::{
    m20260301_000001_create_clients_table::Clients,
    m20260301_000002_create_matters_table::Matters,
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
                    .table(Deadlines::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Deadlines::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Deadlines::Title).string().not_null())
                    .col(ColumnDef::new(Deadlines::Description).text().null())
                    .col(ColumnDef::new(Deadlines::DeadlineType).string().not_null())
                    .col(ColumnDef::new(Deadlines::ClientId).uuid().null())
                    .col(ColumnDef::new(Deadlines::MatterId).uuid().null())
                    .col(ColumnDef::new(Deadlines::Business).string().null())
                    .col(ColumnDef::new(Deadlines::AssignedStaffId).uuid().null())
                    .col(ColumnDef::new(Deadlines::DueDate).date().not_null())
                    .col(ColumnDef::new(Deadlines::Priority).string().not_null())
                    .col(
                        ColumnDef::new(Deadlines::RecurrencePattern)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Deadlines::RecurrenceEndDate).date().null())
                    .col(ColumnDef::new(Deadlines::ParentDeadlineId).uuid().null())
                    .col(
                        ColumnDef::new(Deadlines::IsCompleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Deadlines::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Deadlines::CompletedById).uuid().null())
                    .col(ColumnDef::new(Deadlines::CreatedById).uuid().not_null())
                    .col(
                        ColumnDef::new(Deadlines::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Deadlines::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deadlines_client_id")
                            .from(Deadlines::Table, Deadlines::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deadlines_matter_id")
                            .from(Deadlines::Table, Deadlines::MatterId)
                            .to(Matters::Table, Matters::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deadlines_parent_deadline_id")
                            .from(Deadlines::Table, Deadlines::ParentDeadlineId)
                            .to(Deadlines::Table, Deadlines::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deadlines_created_by_id")
                            .from(Deadlines::Table, Deadlines::CreatedById)
                            .to(StaffAccounts::Table, StaffAccounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_deadlines_business_due_date")
                    .table(Deadlines::Table)
                    .col(Deadlines::Business)
                    .col(Deadlines::DueDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_deadlines_parent_due_date")
                    .table(Deadlines::Table)
                    .col(Deadlines::ParentDeadlineId)
                    .col(Deadlines::DueDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Deadlines::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(crate) enum Deadlines {
    Table,
    Id,
    Title,
    Description,
    DeadlineType,
    ClientId,
    MatterId,
    Business,
    AssignedStaffId,
    DueDate,
    Priority,
    RecurrencePattern,
    RecurrenceEndDate,
    ParentDeadlineId,
    IsCompleted,
    CompletedAt,
    CompletedById,
    CreatedById,
    CreatedAt,
    UpdatedAt,
}
