//! Staff-issued portal invites.
//!
//! A portal invite is client-scoped and single-use. Issuing staff must
//! have the client's business in their own scope.

use auth::{
    access::require_business,
    token::{generate_secure_token, hash_token},
};
use axum::Json;
use chrono::{Duration, Utc};
use entity::{clients, portal_invites, portal_users};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::Set,
    ColumnTrait,
    EntityTrait,
    PaginatorTrait,
    QueryFilter,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::portal::{CreatePortalInviteRequest, PortalInviteResponse},
    middleware::auth::AuthenticatedStaff,
    AppError,
    AppState,
    Result,
};

const PORTAL_INVITE_TTL_DAYS: i64 = 7;

/// Inner handler for creating a portal invite.
pub async fn create_portal_invite_handler_inner(
    state: &AppState,
    actor: AuthenticatedStaff,
    req: CreatePortalInviteRequest,
) -> Result<Json<PortalInviteResponse>> {
    req.validate()?;
    let client = clients::Entity::find_by_id(req.client_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Client not found"))?;

    require_business(&actor.0, client.business)?;

    let existing_user = portal_users::Entity::find()
        .filter(portal_users::Column::ClientId.eq(client.id))
        .count(&state.db)
        .await?;
    if existing_user > 0 {
        return Err(AppError::conflict("This client already has portal access"));
    }

    let now = Utc::now();

    // At most one live invite per client.
    let live_invite = portal_invites::Entity::find()
        .filter(portal_invites::Column::ClientId.eq(client.id))
        .filter(portal_invites::Column::UsedAt.is_null())
        .filter(portal_invites::Column::ExpiresAt.gt(now))
        .count(&state.db)
        .await?;
    if live_invite > 0 {
        return Err(AppError::conflict("A pending invite already exists for this client"));
    }

    let token = generate_secure_token();
    let expires_at = now + Duration::days(PORTAL_INVITE_TTL_DAYS);

    let invite = portal_invites::ActiveModel {
        id:         Set(Uuid::new_v4()),
        client_id:  Set(client.id),
        email:      Set(req.email),
        token_hash: Set(hash_token(&token)),
        expires_at: Set(expires_at),
        used_at:    Set(None),
        created_by: Set(actor.0.id),
        created_at: Set(now),
    }
    .insert(&state.db)
    .await?;

    info!(
        invite_id = %invite.id,
        client_id = %client.id,
        created_by = %actor.0.id,
        "Portal invite created"
    );

    Ok(Json(PortalInviteResponse {
        success:    true,
        invite_url: format!("{}/portal/register?token={}", state.config.base_url, token),
        expires_at,
    }))
}
