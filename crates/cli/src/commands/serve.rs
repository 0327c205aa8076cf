//! Server startup.

use anyhow::anyhow;
use error::Result;
use migration::{Migrator, MigratorTrait as _};
use server::{create_app_router, AppConfig, AppState};
use tokio::net::TcpListener;
use tracing::info;

/// Starts the API server.
///
/// Migrations run automatically on startup, and the configured initial
/// owner account is created when the staff table is empty.
pub async fn run() -> Result<()> {
    let config = AppConfig::from_env()?;

    info!(target: "serve", "Connecting to database...");
    let db = migration::connect_to_database(&config.database_url)
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

    info!(target: "serve", "Running database migrations...");
    Migrator::up(&db, None)
        .await
        .map_err(|e| anyhow!("Failed to run database migrations: {}", e))?;
    info!(target: "serve", "Database migrations completed successfully");

    let listen_addr = config.listen_addr.clone();
    let state = AppState::new(db, config);

    server::staff::accounts::ensure_initial_owner(&state).await?;

    let app = create_app_router(state);

    let listener = TcpListener::bind(&listen_addr)
        .await
        .map_err(|e| anyhow!("Failed to bind to {}: {}", listen_addr, e))?;

    info!(target: "serve", address = %listen_addr, "Starting HTTP server...");

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow!("Server error: {}", e))?;

    Ok(())
}
