//! # Staff Authentication Handlers
//!
//! Login and password setup for staff accounts.

use auth::{
    password::{hash_password, validate_password_strength, verify_password, PasswordError},
    secrecy::SecretString,
    token::hash_token,
};
use axum::Json;
use chrono::Utc;
use entity::{password_setup_tokens, staff_accounts};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::Set,
    ColumnTrait,
    EntityTrait,
    QueryFilter,
    TransactionTrait,
};
use tracing::{info, warn};
use validator::Validate;

use crate::{
    dto::{
        staff::{LoginRequest, LoginResponse, SetupPasswordRequest, StaffSummary},
        SuccessResponse,
    },
    AppError,
    AppState,
    Result,
};

/// Inner handler for staff login.
///
/// Accepts `AppState` by reference so tests can call it without HTTP
/// extractors.
pub async fn login_handler_inner(state: &AppState, req: LoginRequest) -> Result<Json<LoginResponse>> {
    req.validate()?;
    let account = staff_accounts::Entity::find()
        .filter(staff_accounts::Column::Email.eq(req.email.clone()))
        .one(&state.db)
        .await?;

    // Uniform failure for unknown email, unset password, and mismatch.
    let invalid = || AppError::unauthorized("Invalid email or password");

    let account = account.ok_or_else(invalid)?;

    if !account.is_active {
        warn!(staff_id = %account.id, "Login attempt on deactivated account");
        return Err(invalid());
    }

    let stored_hash = account.password_hash.clone().ok_or_else(invalid)?;

    let password = SecretString::from(req.password);
    let verification = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| AppError::internal(format!("Password verification task failed: {}", e)))?;

    match verification {
        Ok(()) => {},
        Err(PasswordError::VerificationFailed) => return Err(invalid()),
        Err(e) => {
            return Err(AppError::internal(format!(
                "Stored credential is unusable: {}",
                e
            )));
        },
    }

    let access_token =
        auth::jwt::create_access_token(&state.jwt_config, account.id, &account.email)?;

    info!(staff_id = %account.id, "Staff login");

    Ok(Json(LoginResponse {
        success:      true,
        access_token,
        expires_in:   state.jwt_config.expiration_seconds,
        staff:        StaffSummary::from(&account),
    }))
}

/// Inner handler for consuming a password setup token.
///
/// The token is single-use: the consuming update is conditional on
/// `used_at` still being null, so two racing submissions cannot both set
/// the credential.
pub async fn setup_password_handler_inner(
    state: &AppState,
    req: SetupPasswordRequest,
) -> Result<Json<SuccessResponse>> {
    req.validate()?;
    if let Err(errors) = validate_password_strength(&req.password) {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        return Err(AppError::bad_request(format!(
            "Password validation failed: {}",
            messages.join(", ")
        )));
    }

    let now = Utc::now();
    let token_hash = hash_token(&req.token);

    let token = password_setup_tokens::Entity::find()
        .filter(password_setup_tokens::Column::TokenHash.eq(token_hash))
        .one(&state.db)
        .await?
        .filter(|t| t.is_usable(now))
        .ok_or_else(|| AppError::bad_request("Invalid or expired setup token"))?;

    let password = SecretString::from(req.password);
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    let txn = state.db.begin().await?;

    let consumed = password_setup_tokens::Entity::update_many()
        .col_expr(
            password_setup_tokens::Column::UsedAt,
            sea_orm::sea_query::Expr::value(Some(now)),
        )
        .filter(password_setup_tokens::Column::Id.eq(token.id))
        .filter(password_setup_tokens::Column::UsedAt.is_null())
        .exec(&txn)
        .await?;
    if consumed.rows_affected == 0 {
        txn.rollback().await?;
        return Err(AppError::bad_request("Invalid or expired setup token"));
    }

    let mut account: staff_accounts::ActiveModel = staff_accounts::Entity::find_by_id(
        token.staff_account_id,
    )
    .one(&txn)
    .await?
    .ok_or_else(|| AppError::not_found("Staff account not found"))?
    .into();
    account.password_hash = Set(Some(password_hash));
    account.updated_at = Set(now);
    account.update(&txn).await?;

    txn.commit().await?;

    info!(staff_id = %token.staff_account_id, "Password set via setup token");

    Ok(Json(SuccessResponse::ok()))
}
