//! # Staff Invite Lifecycle
//!
//! Owner-issued invitations that let a new staff member register. Expiry is
//! derived at read time; no background job ever rewrites a stored status.

use auth::{
    access::{is_owner, validate_business_access},
    password::{hash_password, validate_password_strength},
    secrecy::SecretString,
    token::{generate_secure_token, hash_token},
};
use axum::Json;
use chrono::{Duration, Utc};
use entity::{
    staff_accounts,
    staff_invites::{self, InviteStatus},
};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::Set,
    ColumnTrait,
    EntityTrait,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
    TransactionTrait,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        staff::{
            CreateInviteRequest,
            InviteResponse,
            InviteSummary,
            RegisterRequest,
            StaffSummary,
            ValidateInviteResponse,
        },
        SuccessResponse,
    },
    middleware::auth::AuthenticatedStaff,
    AppError,
    AppState,
    Result,
};

const DEFAULT_INVITE_TTL_DAYS: i64 = 7;

fn require_owner(actor: &AuthenticatedStaff) -> Result<()> {
    if is_owner(actor.0.role) {
        Ok(())
    }
    else {
        Err(AppError::forbidden("Owner access required"))
    }
}

fn invite_url(state: &AppState, token: &str) -> String {
    format!("{}/staff/register?token={}", state.config.base_url, token)
}

/// Inner handler for creating a staff invite (owner only).
pub async fn create_invite_handler_inner(
    state: &AppState,
    actor: AuthenticatedStaff,
    req: CreateInviteRequest,
) -> Result<Json<InviteResponse>> {
    require_owner(&actor)?;
    req.validate()?;
    validate_business_access(req.role, &req.businesses)?;

    let existing_account = staff_accounts::Entity::find()
        .filter(staff_accounts::Column::Email.eq(req.email.clone()))
        .count(&state.db)
        .await?;
    if existing_account > 0 {
        return Err(AppError::conflict("A staff account with this email already exists"));
    }

    let now = Utc::now();

    // At most one live invite per email.
    let live_invite = staff_invites::Entity::find()
        .filter(staff_invites::Column::Email.eq(req.email.clone()))
        .filter(staff_invites::Column::Status.eq(InviteStatus::Pending))
        .filter(staff_invites::Column::ExpiresAt.gt(now))
        .count(&state.db)
        .await?;
    if live_invite > 0 {
        return Err(AppError::conflict("A pending invite already exists for this email"));
    }

    let ttl_days = req.expires_in_days.unwrap_or(DEFAULT_INVITE_TTL_DAYS);
    let token = generate_secure_token();

    let invite = staff_invites::ActiveModel {
        id:         Set(Uuid::new_v4()),
        email:      Set(req.email),
        role:       Set(req.role),
        businesses: Set(serde_json::to_value(&req.businesses)?),
        status:     Set(InviteStatus::Pending),
        token_hash: Set(hash_token(&token)),
        expires_at: Set(now + Duration::days(ttl_days)),
        created_by: Set(actor.0.id),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await?;

    info!(invite_id = %invite.id, created_by = %actor.0.id, "Staff invite created");

    Ok(Json(InviteResponse {
        success:    true,
        invite:     InviteSummary::from_model(&invite, now),
        invite_url: invite_url(state, &token),
    }))
}

/// Inner handler for listing staff invites (owner only).
pub async fn list_invites_handler_inner(
    state: &AppState,
    actor: AuthenticatedStaff,
) -> Result<Json<Vec<InviteSummary>>> {
    require_owner(&actor)?;

    let now = Utc::now();
    let invites = staff_invites::Entity::find()
        .order_by_desc(staff_invites::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(
        invites
            .iter()
            .map(|i| InviteSummary::from_model(i, now))
            .collect(),
    ))
}

/// Inner handler for revoking a pending invite (owner only).
///
/// Only a live invite can be revoked; the error names the actual state.
pub async fn revoke_invite_handler_inner(
    state: &AppState,
    actor: AuthenticatedStaff,
    invite_id: Uuid,
) -> Result<Json<SuccessResponse>> {
    require_owner(&actor)?;

    let now = Utc::now();
    let invite = staff_invites::Entity::find_by_id(invite_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Invite not found"))?;

    if !invite.is_live(now) {
        return Err(AppError::bad_request(format!(
            "Cannot revoke an invite that is {}",
            invite.effective_status(now)
        )));
    }

    let mut active: staff_invites::ActiveModel = invite.into();
    active.status = Set(InviteStatus::Revoked);
    active.updated_at = Set(now);
    active.update(&state.db).await?;

    info!(invite_id = %invite_id, revoked_by = %actor.0.id, "Staff invite revoked");

    Ok(Json(SuccessResponse::ok()))
}

/// Inner handler for resending a pending invite (owner only).
///
/// Rotates the token and expiry, so any previously delivered link stops
/// working.
pub async fn resend_invite_handler_inner(
    state: &AppState,
    actor: AuthenticatedStaff,
    invite_id: Uuid,
) -> Result<Json<InviteResponse>> {
    require_owner(&actor)?;

    let now = Utc::now();
    let invite = staff_invites::Entity::find_by_id(invite_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Invite not found"))?;

    if !invite.is_live(now) {
        return Err(AppError::bad_request(format!(
            "Cannot resend an invite that is {}",
            invite.effective_status(now)
        )));
    }

    let token = generate_secure_token();
    let mut active: staff_invites::ActiveModel = invite.into();
    active.token_hash = Set(hash_token(&token));
    active.expires_at = Set(now + Duration::days(DEFAULT_INVITE_TTL_DAYS));
    active.updated_at = Set(now);
    let updated = active.update(&state.db).await?;

    info!(invite_id = %invite_id, resent_by = %actor.0.id, "Staff invite resent");

    Ok(Json(InviteResponse {
        success:    true,
        invite:     InviteSummary::from_model(&updated, now),
        invite_url: invite_url(state, &token),
    }))
}

/// Inner handler for the public invite validation endpoint.
///
/// Unknown, revoked, and expired tokens all return the same
/// `{valid: false}` payload so the endpoint leaks nothing.
pub async fn validate_invite_handler_inner(
    state: &AppState,
    token: &str,
) -> Result<Json<ValidateInviteResponse>> {
    let now = Utc::now();
    let invite = staff_invites::Entity::find()
        .filter(staff_invites::Column::TokenHash.eq(hash_token(token)))
        .one(&state.db)
        .await?;

    let response = match invite {
        Some(ref invite) if invite.is_live(now) => {
            ValidateInviteResponse {
                valid:      true,
                email:      Some(invite.email.clone()),
                role:       Some(invite.role),
                businesses: Some(invite.business_set()),
            }
        },
        _ => ValidateInviteResponse::invalid(),
    };

    Ok(Json(response))
}

/// Inner handler for registering through an invite (public).
///
/// The PENDING to ACCEPTED flip is a conditional update inside the same
/// transaction as the account insert, so a token can be consumed at most
/// once even under concurrent submissions.
pub async fn register_handler_inner(
    state: &AppState,
    req: RegisterRequest,
) -> Result<Json<StaffSummary>> {
    req.validate()?;
    if let Err(errors) = validate_password_strength(&req.password) {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        return Err(AppError::bad_request(format!(
            "Password validation failed: {}",
            messages.join(", ")
        )));
    }

    let now = Utc::now();
    let invite = staff_invites::Entity::find()
        .filter(staff_invites::Column::TokenHash.eq(hash_token(&req.token)))
        .one(&state.db)
        .await?
        .filter(|i| i.is_live(now))
        .ok_or_else(|| AppError::bad_request("Invalid or expired invite token"))?;

    let password = SecretString::from(req.password);
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    let txn = state.db.begin().await?;

    // Re-check email uniqueness inside the transaction.
    let existing = staff_accounts::Entity::find()
        .filter(staff_accounts::Column::Email.eq(invite.email.clone()))
        .count(&txn)
        .await?;
    if existing > 0 {
        txn.rollback().await?;
        return Err(AppError::conflict("A staff account with this email already exists"));
    }

    let accepted = staff_invites::Entity::update_many()
        .col_expr(
            staff_invites::Column::Status,
            sea_orm::sea_query::Expr::value(InviteStatus::Accepted),
        )
        .col_expr(
            staff_invites::Column::UpdatedAt,
            sea_orm::sea_query::Expr::value(now),
        )
        .filter(staff_invites::Column::Id.eq(invite.id))
        .filter(staff_invites::Column::Status.eq(InviteStatus::Pending))
        .exec(&txn)
        .await?;
    if accepted.rows_affected == 0 {
        txn.rollback().await?;
        return Err(AppError::bad_request("Invalid or expired invite token"));
    }

    let account = staff_accounts::ActiveModel {
        id:                  Set(Uuid::new_v4()),
        name:                Set(req.name),
        email:               Set(invite.email.clone()),
        password_hash:       Set(Some(password_hash)),
        role:                Set(invite.role),
        businesses:          Set(invite.businesses.clone()),
        is_active:           Set(true),
        can_view_financials: Set(false),
        created_at:          Set(now),
        updated_at:          Set(now),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(staff_id = %account.id, invite_id = %invite.id, "Staff registered via invite");

    Ok(Json(StaffSummary::from(&account)))
}
