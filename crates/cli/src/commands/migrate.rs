//! Database migration command.

use anyhow::anyhow;
use error::Result;
use migration::{Migrator, MigratorTrait as _};
use tracing::info;

use super::MigrateArgs;

pub async fn run(args: &MigrateArgs) -> Result<()> {
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| error::AppError::config("DATABASE_URL is not set"))?;

    let db = migration::connect_to_database(&database_url)
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

    if args.rollback {
        info!(target: "migrate", "Rolling back last migration...");
        Migrator::down(&db, Some(1))
            .await
            .map_err(|e| anyhow!("Rollback failed: {}", e))?;
        info!(target: "migrate", "Rollback completed successfully");
    }
    else {
        info!(target: "migrate", "Running database migrations...");
        Migrator::up(&db, None)
            .await
            .map_err(|e| anyhow!("Migration failed: {}", e))?;
        info!(target: "migrate", "Migrations completed successfully");
    }

    Ok(())
}
