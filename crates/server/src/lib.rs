//! # Praxis API Server
//!
//! Axum-based HTTP API for the Praxis back office.
//!
//! ## Modules
//!
//! - [`staff`]: Staff authentication, accounts, invites, bootstrap
//! - [`deadlines`]: Deadline engine (recurrence, reminders, completion)
//! - [`portal`]: Client portal gateway (sessions, scoped reads)
//! - [`dto`]: Request/response data transfer objects
//! - [`middleware`]: HTTP middleware (staff JWT auth, CORS)
//! - [`router`]: API route configuration

pub mod config;
pub mod deadlines;
pub mod dto;
pub mod middleware;
pub mod portal;
pub mod router;
pub mod staff;

pub use config::AppConfig;
pub use error::{AppError, Result};
pub use router::create_app_router;

use ::auth::JwtConfig;

/// Application state shared across request handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection pool
    pub db:         sea_orm::DbConn,
    /// Environment-driven application configuration
    pub config:     AppConfig,
    /// JWT configuration for staff access tokens
    pub jwt_config: JwtConfig,
    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

impl AppState {
    #[must_use]
    pub fn new(db: sea_orm::DbConn, config: AppConfig) -> Self {
        let jwt_config = config.jwt_config();
        Self {
            db,
            config,
            jwt_config,
            start_time: std::time::Instant::now(),
        }
    }
}
