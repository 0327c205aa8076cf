//! Migration: Create staff accounts table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StaffAccounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StaffAccounts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StaffAccounts::Name).string().not_null())
                    .col(
                        ColumnDef::new(StaffAccounts::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(StaffAccounts::PasswordHash).string().null())
                    .col(ColumnDef::new(StaffAccounts::Role).string().not_null())
                    .col(ColumnDef::new(StaffAccounts::Businesses).json().not_null())
                    .col(
                        ColumnDef::new(StaffAccounts::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(StaffAccounts::CanViewFinancials)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(StaffAccounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(StaffAccounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StaffAccounts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(crate) enum StaffAccounts {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Role,
    Businesses,
    IsActive,
    CanViewFinancials,
    CreatedAt,
    UpdatedAt,
}
