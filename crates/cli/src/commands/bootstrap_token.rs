//! Bootstrap token minting.
//!
//! Prints the plaintext token once; only its hash is stored.

use anyhow::anyhow;
use auth::token::{generate_secure_token, hash_token};
use chrono::{Duration, Utc};
use entity::bootstrap_tokens;
use error::Result;
use migration::{Migrator, MigratorTrait as _};
use sea_orm::{ActiveModelTrait, ActiveValue::Set};
use tracing::info;
use uuid::Uuid;

use super::BootstrapTokenArgs;

pub async fn run(args: &BootstrapTokenArgs) -> Result<()> {
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| error::AppError::config("DATABASE_URL is not set"))?;

    let db = migration::connect_to_database(&database_url)
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

    Migrator::up(&db, None)
        .await
        .map_err(|e| anyhow!("Failed to run database migrations: {}", e))?;

    let now = Utc::now();
    let token = generate_secure_token();
    let expires_at = now + Duration::hours(args.ttl_hours);

    bootstrap_tokens::ActiveModel {
        id:          Set(Uuid::new_v4()),
        token_hash:  Set(hash_token(&token)),
        expires_at:  Set(expires_at),
        consumed_at: Set(None),
        created_at:  Set(now),
    }
    .insert(&db)
    .await?;

    info!(target: "bootstrap-token", expires_at = %expires_at, "Bootstrap token minted");

    println!("{}", token);

    Ok(())
}
