//! Portal session middleware.
//!
//! Portal sessions are opaque bearer tokens backed by database rows. The
//! middleware validates the token, slides the expiry forward, and attaches
//! a [`PortalContext`] for downstream handlers. Expiry is sliding: each
//! authenticated request renews the session for the full TTL.

use auth::{jwt::extract_bearer_token, token::hash_token};
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{Duration, Utc};
use entity::{portal_sessions, portal_users};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter};
use serde_json::json;
use uuid::Uuid;

use super::auth::SESSION_TTL_MINUTES;
use crate::AppState;

/// Portal identity attached to authenticated portal requests.
///
/// `client_id` is the scoping key: every portal data read filters on it.
#[derive(Debug, Clone)]
pub struct PortalContext {
    pub portal_user_id: Uuid,
    pub client_id:      Uuid,
    pub email:          String,
    pub session_id:     Uuid,
}

/// Portal session middleware
///
/// 1. Extracts the Bearer token and looks up its hash
/// 2. Rejects expired sessions and inactive accounts
/// 3. Slides the session expiry and stamps activity timestamps
/// 4. Attaches the portal context to request extensions
pub async fn portal_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request.headers().get(header::AUTHORIZATION) {
        Some(header) => {
            match header.to_str() {
                Ok(h) => h,
                Err(_) => {
                    return portal_error_response("Invalid authorization header encoding");
                },
            }
        },
        None => {
            return portal_error_response("Missing authorization header");
        },
    };

    let token = match extract_bearer_token(auth_header) {
        Some(token) => token,
        None => {
            return portal_error_response("Invalid authorization header format");
        },
    };

    let now = Utc::now();
    let session = match portal_sessions::Entity::find()
        .filter(portal_sessions::Column::TokenHash.eq(hash_token(&token)))
        .one(&state.db)
        .await
    {
        Ok(Some(session)) => session,
        Ok(None) => {
            return portal_error_response("Invalid session");
        },
        Err(e) => {
            tracing::error!(error = %e, "Failed to load portal session");
            return database_error_response();
        },
    };

    if session.is_expired(now) {
        return portal_error_response("Session has expired");
    }

    let user = match portal_users::Entity::find_by_id(session.portal_user_id)
        .one(&state.db)
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            return portal_error_response("Account no longer exists");
        },
        Err(e) => {
            tracing::error!(error = %e, "Failed to load portal user for auth");
            return database_error_response();
        },
    };

    if !user.is_active {
        return portal_error_response("Account is deactivated");
    }

    // Sliding expiry: each request renews the session for the full TTL.
    let session_id = session.id;
    let mut active_session: portal_sessions::ActiveModel = session.into();
    active_session.expires_at = Set(now + Duration::minutes(SESSION_TTL_MINUTES));
    active_session.last_activity_at = Set(now);
    if let Err(e) = active_session.update(&state.db).await {
        tracing::error!(error = %e, "Failed to renew portal session");
        return database_error_response();
    }

    let context = PortalContext {
        portal_user_id: user.id,
        client_id:      user.client_id,
        email:          user.email.clone(),
        session_id,
    };

    let mut active_user: portal_users::ActiveModel = user.into();
    active_user.last_activity_at = Set(Some(now));
    if let Err(e) = active_user.update(&state.db).await {
        // Activity stamping is an audit aid; the session itself is valid.
        tracing::warn!(error = %e, "Failed to stamp portal user activity");
    }

    request.extensions_mut().insert(context);

    next.run(request).await
}

fn portal_error_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Bearer")],
        axum::Json(json!({
            "success": false,
            "code": "UNAUTHORIZED",
            "message": message,
        })),
    )
        .into_response()
}

fn database_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(json!({
            "success": false,
            "code": "DATABASE_ERROR",
            "message": "Authentication temporarily unavailable",
        })),
    )
        .into_response()
}
