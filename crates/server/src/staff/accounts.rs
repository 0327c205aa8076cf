//! # Staff Account Administration
//!
//! Owner-only creation and maintenance of staff accounts. Accounts are
//! deactivated rather than deleted.

use auth::{
    access::{is_owner, validate_business_access},
    password::{hash_password, validate_password_strength},
    secrecy::SecretString,
    token::{generate_secure_token, hash_token},
};
use axum::Json;
use chrono::{Duration, Utc};
use entity::{password_setup_tokens, staff_accounts, StaffRole};
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
        staff::{CreateStaffRequest, CreateStaffResponse, SetActiveRequest, StaffSummary, UpdateStaffRequest},
        SuccessResponse,
    },
    middleware::auth::AuthenticatedStaff,
    AppError,
    AppState,
    Result,
};

const SETUP_TOKEN_TTL_DAYS: i64 = 7;

fn require_owner(actor: &AuthenticatedStaff) -> Result<()> {
    if is_owner(actor.0.role) {
        Ok(())
    }
    else {
        Err(AppError::forbidden("Owner access required"))
    }
}

/// Creates the configured initial owner account when the staff table is
/// empty. Called once at startup; a non-empty table makes this a no-op.
pub async fn ensure_initial_owner(state: &AppState) -> Result<()> {
    let Some(ref owner) = state.config.initial_owner else {
        return Ok(());
    };

    let count = staff_accounts::Entity::find().count(&state.db).await?;
    if count > 0 {
        return Ok(());
    }

    let password = SecretString::from(owner.password.clone());
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    let now = Utc::now();
    let id = Uuid::new_v4();
    staff_accounts::ActiveModel {
        id:                  Set(id),
        name:                Set(owner.name.clone()),
        email:               Set(owner.email.clone()),
        password_hash:       Set(Some(password_hash)),
        role:                Set(StaffRole::Owner),
        businesses:          Set(serde_json::json!(["gcmc", "kaj"])),
        is_active:           Set(true),
        can_view_financials: Set(true),
        created_at:          Set(now),
        updated_at:          Set(now),
    }
    .insert(&state.db)
    .await?;

    info!(staff_id = %id, email = %owner.email, "Initial owner account created");
    Ok(())
}

/// Inner handler for listing staff accounts (owner only).
pub async fn list_staff_handler_inner(
    state: &AppState,
    actor: AuthenticatedStaff,
) -> Result<Json<Vec<StaffSummary>>> {
    require_owner(&actor)?;

    let accounts = staff_accounts::Entity::find()
        .order_by_asc(staff_accounts::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(accounts.iter().map(StaffSummary::from).collect()))
}

/// Inner handler for creating a staff account (owner only).
///
/// Without a password in the request, a one-shot setup token is issued and
/// the setup URL is returned for out-of-band delivery.
pub async fn create_staff_handler_inner(
    state: &AppState,
    actor: AuthenticatedStaff,
    req: CreateStaffRequest,
) -> Result<Json<CreateStaffResponse>> {
    require_owner(&actor)?;
    req.validate()?;
    validate_business_access(req.role, &req.businesses)?;

    let existing = staff_accounts::Entity::find()
        .filter(staff_accounts::Column::Email.eq(req.email.clone()))
        .count(&state.db)
        .await?;
    if existing > 0 {
        return Err(AppError::conflict("A staff account with this email already exists"));
    }

    let password_hash = match req.password {
        Some(ref plaintext) => {
            if let Err(errors) = validate_password_strength(plaintext) {
                let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                return Err(AppError::bad_request(format!(
                    "Password validation failed: {}",
                    messages.join(", ")
                )));
            }
            let password = SecretString::from(plaintext.clone());
            let hash = tokio::task::spawn_blocking(move || hash_password(&password))
                .await
                .map_err(|e| AppError::internal(format!("Password hashing task failed: {}", e)))?
                .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;
            Some(hash)
        },
        None => None,
    };

    let now = Utc::now();
    let staff_id = Uuid::new_v4();
    let issue_setup_token = password_hash.is_none();

    let txn = state.db.begin().await?;

    let account = staff_accounts::ActiveModel {
        id:                  Set(staff_id),
        name:                Set(req.name),
        email:               Set(req.email),
        password_hash:       Set(password_hash),
        role:                Set(req.role),
        businesses:          Set(serde_json::to_value(&req.businesses)?),
        is_active:           Set(true),
        can_view_financials: Set(req.can_view_financials),
        created_at:          Set(now),
        updated_at:          Set(now),
    }
    .insert(&txn)
    .await?;

    let setup_url = if issue_setup_token {
        let token = generate_secure_token();
        password_setup_tokens::ActiveModel {
            id:               Set(Uuid::new_v4()),
            staff_account_id: Set(staff_id),
            token_hash:       Set(hash_token(&token)),
            expires_at:       Set(now + Duration::days(SETUP_TOKEN_TTL_DAYS)),
            used_at:          Set(None),
            created_at:       Set(now),
        }
        .insert(&txn)
        .await?;
        Some(format!(
            "{}/staff/setup-password?token={}",
            state.config.base_url, token
        ))
    }
    else {
        None
    };

    txn.commit().await?;

    info!(staff_id = %staff_id, created_by = %actor.0.id, "Staff account created");

    Ok(Json(CreateStaffResponse {
        success: true,
        staff: StaffSummary::from(&account),
        setup_url,
    }))
}

/// Inner handler for updating a staff account (owner only).
///
/// Role and business changes are validated together against the pairing
/// invariant, whichever of the two the request carries.
pub async fn update_staff_handler_inner(
    state: &AppState,
    actor: AuthenticatedStaff,
    staff_id: Uuid,
    req: UpdateStaffRequest,
) -> Result<Json<StaffSummary>> {
    require_owner(&actor)?;
    req.validate()?;

    let account = staff_accounts::Entity::find_by_id(staff_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Staff account not found"))?;

    let new_role = req.role.unwrap_or(account.role);
    let new_businesses = match req.businesses {
        Some(ref b) => b.clone(),
        None => account.business_set(),
    };
    validate_business_access(new_role, &new_businesses)?;

    let mut active: staff_accounts::ActiveModel = account.into();
    if let Some(name) = req.name {
        active.name = Set(name);
    }
    active.role = Set(new_role);
    active.businesses = Set(serde_json::to_value(&new_businesses)?);
    if let Some(can_view) = req.can_view_financials {
        active.can_view_financials = Set(can_view);
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(&state.db).await?;

    info!(staff_id = %staff_id, updated_by = %actor.0.id, "Staff account updated");

    Ok(Json(StaffSummary::from(&updated)))
}

/// Inner handler for activating or deactivating an account (owner only).
///
/// Self-deactivation is rejected so the system cannot lose its last
/// active owner by accident.
pub async fn set_active_handler_inner(
    state: &AppState,
    actor: AuthenticatedStaff,
    staff_id: Uuid,
    req: SetActiveRequest,
) -> Result<Json<SuccessResponse>> {
    require_owner(&actor)?;

    if staff_id == actor.0.id && !req.is_active {
        return Err(AppError::bad_request("Cannot deactivate your own account"));
    }

    let account = staff_accounts::Entity::find_by_id(staff_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Staff account not found"))?;

    let mut active: staff_accounts::ActiveModel = account.into();
    active.is_active = Set(req.is_active);
    active.updated_at = Set(Utc::now());
    active.update(&state.db).await?;

    info!(
        staff_id = %staff_id,
        is_active = req.is_active,
        updated_by = %actor.0.id,
        "Staff account activation changed"
    );

    Ok(Json(SuccessResponse::ok()))
}
