pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_clients_table;
mod m20260301_000002_create_matters_table;
mod m20260301_000003_create_documents_table;
mod m20260302_000004_create_staff_accounts_table;
mod m20260302_000005_create_staff_invites_table;
mod m20260302_000006_create_credential_tokens_tables;
mod m20260303_000007_create_deadlines_table;
mod m20260303_000008_create_deadline_reminders_table;
mod m20260304_000009_create_portal_users_table;
mod m20260304_000010_create_portal_sessions_table;
mod m20260304_000011_create_portal_invites_table;
mod m20260304_000012_create_portal_password_resets_table;
mod m20260304_000013_create_portal_activity_log_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_clients_table::Migration),
            Box::new(m20260301_000002_create_matters_table::Migration),
            Box::new(m20260301_000003_create_documents_table::Migration),
            Box::new(m20260302_000004_create_staff_accounts_table::Migration),
            Box::new(m20260302_000005_create_staff_invites_table::Migration),
            Box::new(m20260302_000006_create_credential_tokens_tables::Migration),
            Box::new(m20260303_000007_create_deadlines_table::Migration),
            Box::new(m20260303_000008_create_deadline_reminders_table::Migration),
            Box::new(m20260304_000009_create_portal_users_table::Migration),
            Box::new(m20260304_000010_create_portal_sessions_table::Migration),
            Box::new(m20260304_000011_create_portal_invites_table::Migration),
            Box::new(m20260304_000012_create_portal_password_resets_table::Migration),
            Box::new(m20260304_000013_create_portal_activity_log_table::Migration),
        ]
    }
}

/// Database connection helper for CLI usage
pub async fn connect_to_database(database_url: &str) -> Result<sea_orm::DatabaseConnection, sea_orm::DbErr> {
    sea_orm::Database::connect(database_url).await
}
