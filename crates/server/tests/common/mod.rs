//! # Common Test Utilities
//!
//! Shared infrastructure for integration tests: an in-memory SQLite
//! database with the full migration set applied, plus seed helpers.

#![allow(dead_code)]

use std::sync::Once;

use auth::{password::hash_password, secrecy::SecretString};
use chrono::Utc;
use entity::{clients, matters, staff_accounts, Business, StaffRole};
use migration::{Migrator, MigratorTrait as _};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, Database};
use server::{config::InitialOwner, middleware::auth::AuthenticatedStaff, AppConfig, AppState};
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "SecureTestPassword123";

// "test-jwt-secret-for-integration-tests" in base64.
const TEST_JWT_SECRET: &str = "dGVzdC1qd3Qtc2VjcmV0LWZvci1pbnRlZ3JhdGlvbi10ZXN0cw==";

static INIT: Once = Once::new();

/// Initialize test logging (run once per test session)
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url:     "sqlite::memory:".to_string(),
        listen_addr:      "127.0.0.1:0".to_string(),
        base_url:         "http://localhost:3000".to_string(),
        cors_origin:      None,
        initial_owner:    None,
        bootstrap_secret: Some("test-bootstrap-secret".to_string()),
        jwt_secret:       TEST_JWT_SECRET.to_string(),
    }
}

/// Creates app state backed by a fresh in-memory database.
pub async fn setup_state() -> AppState {
    init_test_env();
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Failed to run migrations");
    AppState::new(db, test_config())
}

/// Creates app state with a configured initial owner.
pub async fn setup_state_with_initial_owner(email: &str) -> AppState {
    init_test_env();
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Failed to run migrations");
    let mut config = test_config();
    config.initial_owner = Some(InitialOwner {
        email:    email.to_string(),
        password: TEST_PASSWORD.to_string(),
        name:     "Initial Owner".to_string(),
    });
    AppState::new(db, config)
}

/// Seeds a staff account with the test password set.
pub async fn create_staff(
    state: &AppState,
    email: &str,
    role: StaffRole,
    businesses: &[Business],
) -> staff_accounts::Model {
    let password = SecretString::from(TEST_PASSWORD.to_string());
    let password_hash = hash_password(&password).expect("Failed to hash password");

    let now = Utc::now();
    staff_accounts::ActiveModel {
        id:                  Set(Uuid::new_v4()),
        name:                Set(format!("Test {}", role)),
        email:               Set(email.to_string()),
        password_hash:       Set(Some(password_hash)),
        role:                Set(role),
        businesses:          Set(serde_json::to_value(businesses).expect("businesses json")),
        is_active:           Set(true),
        can_view_financials: Set(role == StaffRole::Owner),
        created_at:          Set(now),
        updated_at:          Set(now),
    }
    .insert(&state.db)
    .await
    .expect("Failed to insert staff account")
}

/// Wraps a seeded account the way the auth middleware would.
pub fn as_actor(account: &staff_accounts::Model) -> AuthenticatedStaff {
    AuthenticatedStaff(account.clone())
}

/// Seeds a client for one business.
pub async fn create_client(state: &AppState, business: Business, email: &str) -> clients::Model {
    let now = Utc::now();
    clients::ActiveModel {
        id:         Set(Uuid::new_v4()),
        business:   Set(business),
        name:       Set(format!("Client {}", email)),
        email:      Set(email.to_string()),
        phone:      Set(None),
        created_at: Set(now),
    }
    .insert(&state.db)
    .await
    .expect("Failed to insert client")
}

/// Seeds an open matter for a client.
pub async fn create_matter(state: &AppState, client: &clients::Model, title: &str) -> matters::Model {
    let now = Utc::now();
    matters::ActiveModel {
        id:          Set(Uuid::new_v4()),
        client_id:   Set(client.id),
        business:    Set(client.business),
        title:       Set(title.to_string()),
        description: Set(None),
        status:      Set(matters::MatterStatus::Open),
        opened_at:   Set(now),
        created_at:  Set(now),
    }
    .insert(&state.db)
    .await
    .expect("Failed to insert matter")
}
