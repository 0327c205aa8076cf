//! Migration: Create deadline reminders table

use sea_orm_migration::prelude::*;

use crate::m20260303_000007_create_deadlines_table::Deadlines;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DeadlineReminders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeadlineReminders::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DeadlineReminders::DeadlineId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeadlineReminders::DaysBefore)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeadlineReminders::ReminderDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeadlineReminders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deadline_reminders_deadline_id")
                            .from(DeadlineReminders::Table, DeadlineReminders::DeadlineId)
                            .to(Deadlines::Table, Deadlines::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_deadline_reminders_reminder_date")
                    .table(DeadlineReminders::Table)
                    .col(DeadlineReminders::ReminderDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DeadlineReminders::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DeadlineReminders {
    Table,
    Id,
    DeadlineId,
    DaysBefore,
    ReminderDate,
    CreatedAt,
}
