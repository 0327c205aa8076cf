//! # First-Run Bootstrap
//!
//! Creates the first owner account. The endpoint only works while the
//! staff table is empty and requires either the deployment bootstrap
//! secret or a minted one-shot bootstrap token. The emptiness check is
//! repeated inside the transaction, so two racing bootstrap calls cannot
//! both succeed.

use auth::{
    password::{hash_password, validate_password_strength},
    secrecy::SecretString,
    subtle::ConstantTimeEq,
    token::hash_token,
};
use axum::Json;
use chrono::Utc;
use entity::{bootstrap_tokens, staff_accounts, StaffRole};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::Set,
    ColumnTrait,
    EntityTrait,
    PaginatorTrait,
    QueryFilter,
    TransactionTrait,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::staff::{BootstrapRequest, StaffSummary},
    AppError,
    AppState,
    Result,
};

fn secret_matches(supplied: &str, configured: &str) -> bool {
    supplied.as_bytes().ct_eq(configured.as_bytes()).into()
}

/// Inner handler for the public bootstrap endpoint.
pub async fn bootstrap_handler_inner(
    state: &AppState,
    req: BootstrapRequest,
) -> Result<Json<StaffSummary>> {
    req.validate()?;
    let staff_count = staff_accounts::Entity::find().count(&state.db).await?;
    if staff_count > 0 {
        return Err(AppError::forbidden("System is already bootstrapped"));
    }

    if let Err(errors) = validate_password_strength(&req.password) {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        return Err(AppError::bad_request(format!(
            "Password validation failed: {}",
            messages.join(", ")
        )));
    }

    let now = Utc::now();

    // Authorize via the configured secret or a minted one-shot token.
    let env_match = state
        .config
        .bootstrap_secret
        .as_deref()
        .map(|configured| secret_matches(&req.secret, configured))
        .unwrap_or(false);

    let db_token = if env_match {
        None
    }
    else {
        let token = bootstrap_tokens::Entity::find()
            .filter(bootstrap_tokens::Column::TokenHash.eq(hash_token(&req.secret)))
            .one(&state.db)
            .await?
            .filter(|t| t.is_usable(now));
        if token.is_none() {
            return Err(AppError::unauthorized("Invalid bootstrap secret"));
        }
        token
    };

    let password = SecretString::from(req.password);
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    let txn = state.db.begin().await?;

    // Re-verify emptiness inside the transaction.
    let staff_count = staff_accounts::Entity::find().count(&txn).await?;
    if staff_count > 0 {
        txn.rollback().await?;
        return Err(AppError::forbidden("System is already bootstrapped"));
    }

    if let Some(token) = db_token {
        let consumed = bootstrap_tokens::Entity::update_many()
            .col_expr(
                bootstrap_tokens::Column::ConsumedAt,
                sea_orm::sea_query::Expr::value(Some(now)),
            )
            .filter(bootstrap_tokens::Column::Id.eq(token.id))
            .filter(bootstrap_tokens::Column::ConsumedAt.is_null())
            .exec(&txn)
            .await?;
        if consumed.rows_affected == 0 {
            txn.rollback().await?;
            return Err(AppError::unauthorized("Invalid bootstrap secret"));
        }
    }

    let account = staff_accounts::ActiveModel {
        id:                  Set(Uuid::new_v4()),
        name:                Set(req.name),
        email:               Set(req.email),
        password_hash:       Set(Some(password_hash)),
        role:                Set(StaffRole::Owner),
        businesses:          Set(serde_json::json!(["gcmc", "kaj"])),
        is_active:           Set(true),
        can_view_financials: Set(true),
        created_at:          Set(now),
        updated_at:          Set(now),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(staff_id = %account.id, "System bootstrapped with first owner account");

    Ok(Json(StaffSummary::from(&account)))
}
