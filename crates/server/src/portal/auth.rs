//! Portal credential flows: registration, login with lockout, logout, and
//! password reset.
//!
//! The lockout counter lives on the portal user row. Failed attempts are
//! counted with a conditional update filtered on the previously read
//! value, so two racing failures both land as at most one increment each
//! and the counter never jumps past reality.

use auth::{
    password::{hash_password, validate_password_strength, verify_password, PasswordError},
    secrecy::SecretString,
    token::{generate_secure_token, hash_token},
};
use axum::Json;
use chrono::{Duration, Utc};
use entity::{
    portal_invites,
    portal_password_resets,
    portal_sessions,
    portal_users,
};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::Set,
    ColumnTrait,
    EntityTrait,
    PaginatorTrait,
    QueryFilter,
    TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use super::{activity::log_activity, middleware::PortalContext};
use crate::{
    dto::{
        portal::{
            PortalLoginRequest,
            PortalLoginResponse,
            PortalRegisterRequest,
            RequestPasswordResetRequest,
            ResetPasswordRequest,
        },
        SuccessResponse,
    },
    AppError,
    AppState,
    Result,
};

/// Failed attempts that trigger a lockout.
pub const MAX_LOGIN_ATTEMPTS: i32 = 5;

/// Lockout and failure-counting window.
pub const LOCKOUT_WINDOW_MINUTES: i64 = 15;

/// Sliding session lifetime.
pub const SESSION_TTL_MINUTES: i64 = 30;

const RESET_TOKEN_TTL_MINUTES: i64 = 60;

fn uniform_login_failure() -> AppError { AppError::unauthorized("Invalid email or password") }

async fn hash_password_blocking(password: String) -> Result<String> {
    let password = SecretString::from(password);
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))
}

/// Inner handler for portal registration through a staff-issued invite.
///
/// The invite is consumed with a conditional update inside the same
/// transaction as the portal user insert. A client can hold at most one
/// portal account; the uniqueness check is repeated inside the
/// transaction.
pub async fn portal_register_handler_inner(
    state: &AppState,
    req: PortalRegisterRequest,
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
    let invite = portal_invites::Entity::find()
        .filter(portal_invites::Column::TokenHash.eq(hash_token(&req.token)))
        .one(&state.db)
        .await?
        .filter(|i| i.is_usable(now))
        .ok_or_else(|| AppError::bad_request("Invalid or expired invite token"))?;

    let password_hash = hash_password_blocking(req.password).await?;

    let txn = state.db.begin().await?;

    let consumed = portal_invites::Entity::update_many()
        .col_expr(
            portal_invites::Column::UsedAt,
            sea_orm::sea_query::Expr::value(Some(now)),
        )
        .filter(portal_invites::Column::Id.eq(invite.id))
        .filter(portal_invites::Column::UsedAt.is_null())
        .exec(&txn)
        .await?;
    if consumed.rows_affected == 0 {
        txn.rollback().await?;
        return Err(AppError::bad_request("Invalid or expired invite token"));
    }

    let existing = portal_users::Entity::find()
        .filter(portal_users::Column::ClientId.eq(invite.client_id))
        .count(&txn)
        .await?;
    if existing > 0 {
        txn.rollback().await?;
        return Err(AppError::conflict("This client already has portal access"));
    }

    let user = portal_users::ActiveModel {
        id:                   Set(Uuid::new_v4()),
        client_id:            Set(invite.client_id),
        email:                Set(invite.email.clone()),
        password_hash:        Set(password_hash),
        is_active:            Set(true),
        login_attempts:       Set(0),
        last_failed_login_at: Set(None),
        last_login_at:        Set(None),
        last_activity_at:     Set(None),
        created_at:           Set(now),
        updated_at:           Set(now),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(portal_user_id = %user.id, client_id = %invite.client_id, "Portal account registered");

    Ok(Json(SuccessResponse::ok()))
}

/// Inner handler for portal login.
///
/// A locked account is rejected before any password work happens, so
/// hammering a locked account yields no verification oracle. An elapsed
/// lockout window silently resets the counter.
pub async fn portal_login_handler_inner(
    state: &AppState,
    req: PortalLoginRequest,
    ip_address: Option<String>,
    user_agent: Option<String>,
) -> Result<Json<PortalLoginResponse>> {
    req.validate()?;
    let now = Utc::now();
    let user = portal_users::Entity::find()
        .filter(portal_users::Column::Email.eq(req.email.clone()))
        .one(&state.db)
        .await?
        .ok_or_else(uniform_login_failure)?;

    if !user.is_active {
        warn!(portal_user_id = %user.id, "Login attempt for deactivated portal account");
        return Err(uniform_login_failure());
    }

    // Attempts outside the window no longer count.
    let window_start = now - Duration::minutes(LOCKOUT_WINDOW_MINUTES);
    let in_window = user
        .last_failed_login_at
        .map(|at| at > window_start)
        .unwrap_or(false);
    let effective_attempts = if in_window { user.login_attempts } else { 0 };

    if effective_attempts >= MAX_LOGIN_ATTEMPTS {
        // last_failed_login_at is Some when in_window holds.
        let locked_until = user
            .last_failed_login_at
            .map(|at| at + Duration::minutes(LOCKOUT_WINDOW_MINUTES))
            .unwrap_or(now);
        let remaining = (locked_until - now).num_seconds().max(1) as u64;
        return Err(AppError::rate_limited(
            "Too many failed login attempts, try again later",
            remaining,
        ));
    }

    let password = req.password;
    let stored_hash = user.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || {
        verify_password(&SecretString::from(password), &stored_hash)
    })
    .await
    .map_err(|e| AppError::internal(format!("Password verification task failed: {}", e)))?;

    if let Err(e) = verified {
        match e {
            PasswordError::VerificationFailed => {
                // Conditional on the attempt count we read; a lost race
                // means another failure already counted.
                portal_users::Entity::update_many()
                    .col_expr(
                        portal_users::Column::LoginAttempts,
                        sea_orm::sea_query::Expr::value(effective_attempts + 1),
                    )
                    .col_expr(
                        portal_users::Column::LastFailedLoginAt,
                        sea_orm::sea_query::Expr::value(Some(now)),
                    )
                    .filter(portal_users::Column::Id.eq(user.id))
                    .filter(portal_users::Column::LoginAttempts.eq(user.login_attempts))
                    .exec(&state.db)
                    .await?;
                return Err(uniform_login_failure());
            },
            _ => {
                return Err(AppError::internal("Stored credential is unusable"));
            },
        }
    }

    let expires_at = now + Duration::minutes(SESSION_TTL_MINUTES);
    let token = generate_secure_token();

    let txn = state.db.begin().await?;

    let mut active: portal_users::ActiveModel = user.clone().into();
    active.login_attempts = Set(0);
    active.last_failed_login_at = Set(None);
    active.last_login_at = Set(Some(now));
    active.last_activity_at = Set(Some(now));
    active.updated_at = Set(now);
    active.update(&txn).await?;

    portal_sessions::ActiveModel {
        id:               Set(Uuid::new_v4()),
        portal_user_id:   Set(user.id),
        token_hash:       Set(hash_token(&token)),
        expires_at:       Set(expires_at),
        created_at:       Set(now),
        last_activity_at: Set(now),
        ip_address:       Set(ip_address.clone()),
        user_agent:       Set(user_agent),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    log_activity(&state.db, user.id, "login", None, ip_address).await;

    info!(portal_user_id = %user.id, "Portal login succeeded");

    Ok(Json(PortalLoginResponse {
        success: true,
        session_token: token,
        expires_at,
    }))
}

/// Inner handler for portal logout. Deletes the session row; the bearer
/// token is dead immediately.
pub async fn portal_logout_handler_inner(
    state: &AppState,
    ctx: PortalContext,
) -> Result<Json<SuccessResponse>> {
    portal_sessions::Entity::delete_by_id(ctx.session_id)
        .exec(&state.db)
        .await?;

    log_activity(&state.db, ctx.portal_user_id, "logout", None, None).await;

    Ok(Json(SuccessResponse::ok()))
}

/// Inner handler for requesting a password reset link.
///
/// The response is identical whether or not the email exists, so the
/// endpoint cannot be used to enumerate portal accounts.
pub async fn request_password_reset_handler_inner(
    state: &AppState,
    req: RequestPasswordResetRequest,
) -> Result<Json<SuccessResponse>> {
    req.validate()?;
    let now = Utc::now();
    let user = portal_users::Entity::find()
        .filter(portal_users::Column::Email.eq(req.email.clone()))
        .one(&state.db)
        .await?
        .filter(|u| u.is_active);

    if let Some(user) = user {
        let token = generate_secure_token();
        portal_password_resets::ActiveModel {
            id:             Set(Uuid::new_v4()),
            portal_user_id: Set(user.id),
            token_hash:     Set(hash_token(&token)),
            expires_at:     Set(now + Duration::minutes(RESET_TOKEN_TTL_MINUTES)),
            used_at:        Set(None),
            created_at:     Set(now),
        }
        .insert(&state.db)
        .await?;

        // Delivery is out of band; the link is logged for the operator.
        info!(
            portal_user_id = %user.id,
            reset_url = %format!("{}/portal/reset-password?token={}", state.config.base_url, token),
            "Portal password reset requested"
        );
    }

    Ok(Json(SuccessResponse::ok()))
}

/// Inner handler for consuming a password reset token.
///
/// One transaction: consume the token, set the new hash, clear the
/// lockout counter, and delete every live session for the user.
pub async fn reset_password_handler_inner(
    state: &AppState,
    req: ResetPasswordRequest,
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
    let reset = portal_password_resets::Entity::find()
        .filter(portal_password_resets::Column::TokenHash.eq(hash_token(&req.token)))
        .one(&state.db)
        .await?
        .filter(|r| r.is_usable(now))
        .ok_or_else(|| AppError::bad_request("Invalid or expired reset token"))?;

    let password_hash = hash_password_blocking(req.password).await?;

    let txn = state.db.begin().await?;

    let consumed = portal_password_resets::Entity::update_many()
        .col_expr(
            portal_password_resets::Column::UsedAt,
            sea_orm::sea_query::Expr::value(Some(now)),
        )
        .filter(portal_password_resets::Column::Id.eq(reset.id))
        .filter(portal_password_resets::Column::UsedAt.is_null())
        .exec(&txn)
        .await?;
    if consumed.rows_affected == 0 {
        txn.rollback().await?;
        return Err(AppError::bad_request("Invalid or expired reset token"));
    }

    let user = portal_users::Entity::find_by_id(reset.portal_user_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::bad_request("Invalid or expired reset token"))?;

    let user_id = user.id;
    let mut active: portal_users::ActiveModel = user.into();
    active.password_hash = Set(password_hash);
    active.login_attempts = Set(0);
    active.last_failed_login_at = Set(None);
    active.updated_at = Set(now);
    active.update(&txn).await?;

    // A reset invalidates every outstanding session.
    portal_sessions::Entity::delete_many()
        .filter(portal_sessions::Column::PortalUserId.eq(user_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    log_activity(&state.db, user_id, "password_reset", None, None).await;

    info!(portal_user_id = %user_id, "Portal password reset completed");

    Ok(Json(SuccessResponse::ok()))
}
