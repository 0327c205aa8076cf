//! # Staff Authentication Middleware
//!
//! JWT authentication for the staff API. The token only establishes
//! identity; the account is reloaded from the database on every request, so
//! deactivation and role or scope changes take effect immediately instead
//! of waiting for token expiry.

use auth::jwt::{extract_bearer_token, validate_token};
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use entity::staff_accounts::{Column, Entity as StaffEntity};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::json;
use uuid::Uuid;

use crate::AppState;

/// Staff account attached to authenticated requests.
///
/// This is the account as stored at request time, not as claimed by the
/// token.
#[derive(Debug, Clone)]
pub struct AuthenticatedStaff(pub entity::staff_accounts::Model);

/// Staff authentication middleware
///
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the JWT
/// 3. Reloads the staff account and rejects missing or inactive accounts
/// 4. Attaches the fresh account to request extensions
pub async fn staff_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request.headers().get(header::AUTHORIZATION) {
        Some(header) => {
            match header.to_str() {
                Ok(h) => h,
                Err(_) => {
                    return auth_error_response("Invalid authorization header encoding");
                },
            }
        },
        None => {
            return auth_error_response("Missing authorization header");
        },
    };

    let token = match extract_bearer_token(auth_header) {
        Some(token) => token,
        None => {
            return auth_error_response("Invalid authorization header format");
        },
    };

    let claims = match validate_token(&state.jwt_config, &token) {
        Ok(claims) => claims,
        Err(e) => {
            let message = e.to_string().to_lowercase();
            if message.contains("expired") {
                return auth_error_response("Token has expired");
            }
            else {
                return auth_error_response("Invalid token");
            }
        },
    };

    let staff_id = match Uuid::parse_str(&claims.sub) {
        Ok(id) => id,
        Err(_) => {
            return auth_error_response("Invalid token subject");
        },
    };

    let account = match StaffEntity::find()
        .filter(Column::Id.eq(staff_id))
        .one(&state.db)
        .await
    {
        Ok(Some(account)) => account,
        Ok(None) => {
            return auth_error_response("Account no longer exists");
        },
        Err(e) => {
            tracing::error!(error = %e, "Failed to load staff account for auth");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(json!({
                    "success": false,
                    "code": "DATABASE_ERROR",
                    "message": "Authentication temporarily unavailable",
                })),
            )
                .into_response();
        },
    };

    if !account.is_active {
        return auth_error_response("Account is deactivated");
    }

    request.extensions_mut().insert(AuthenticatedStaff(account));

    next.run(request).await
}

/// Create standardized authentication error response
fn auth_error_response(message: &str) -> Response {
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
