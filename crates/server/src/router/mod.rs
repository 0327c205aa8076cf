//! # API Router Configuration
//!
//! Configures API routes for the Praxis application. Handlers here are
//! thin wrappers that unpack extractors and delegate to the inner
//! handlers, which are callable from tests without an HTTP stack.

use axum::{
    extract::{Extension, Path, Query, State as AxumState},
    http::{header, HeaderMap},
    middleware,
    routing::{delete, get, patch, post},
    Json,
    Router,
};
use error::{response::ApiResponse, Result};
use uuid::Uuid;

use crate::{
    middleware::auth::AuthenticatedStaff,
    portal::PortalContext,
    AppState,
};

/// Creates the API router with all routes
///
/// # Arguments
///
/// * `state` - Application state containing DB pool and config
///
/// # Returns
///
/// Configured Axum router with all routes
pub fn create_router(state: AppState) -> Router {
    // Staff routes behind JWT authentication.
    let staff_routes = Router::new()
        .route("/api/v1/staff", get(list_staff_handler))
        .route("/api/v1/staff", post(create_staff_handler))
        .route("/api/v1/staff/:id", patch(update_staff_handler))
        .route("/api/v1/staff/:id/active", post(set_active_handler))
        .route("/api/v1/staff/invites", post(create_invite_handler))
        .route("/api/v1/staff/invites", get(list_invites_handler))
        .route("/api/v1/staff/invites/:id/revoke", post(revoke_invite_handler))
        .route("/api/v1/staff/invites/:id/resend", post(resend_invite_handler))
        .route("/api/v1/deadlines", post(create_deadline_handler))
        .route("/api/v1/deadlines", get(list_deadlines_handler))
        .route("/api/v1/deadlines/:id", get(get_deadline_handler))
        .route("/api/v1/deadlines/:id", patch(update_deadline_handler))
        .route("/api/v1/deadlines/:id", delete(delete_deadline_handler))
        .route("/api/v1/deadlines/:id/complete", post(complete_deadline_handler))
        .route("/api/v1/deadlines/:id/uncomplete", post(uncomplete_deadline_handler))
        .route("/api/v1/deadlines/:id/series", post(update_series_handler))
        .route("/api/v1/deadlines/:id/generate", post(generate_instances_handler))
        .route("/api/v1/portal/invites", post(create_portal_invite_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth::staff_auth_middleware,
        ));

    // Portal routes behind the database-backed session middleware.
    let portal_routes = Router::new()
        .route("/api/v1/portal/auth/logout", post(portal_logout_handler))
        .route("/api/v1/portal/matters", get(portal_list_matters_handler))
        .route("/api/v1/portal/matters/:id", get(portal_get_matter_handler))
        .route("/api/v1/portal/documents", get(portal_list_documents_handler))
        .route(
            "/api/v1/portal/documents/:id/download",
            get(portal_download_document_handler),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::portal::middleware::portal_auth_middleware,
        ));

    // Public routes that don't require authentication
    let public_routes = Router::new()
        .route("/api/v1/auth/login", post(login_handler))
        .route("/api/v1/auth/bootstrap", post(bootstrap_handler))
        .route("/api/v1/staff/invites/validate", get(validate_invite_handler))
        .route("/api/v1/staff/register", post(register_handler))
        .route("/api/v1/staff/setup-password", post(setup_password_handler))
        .route("/api/v1/portal/auth/register", post(portal_register_handler))
        .route("/api/v1/portal/auth/login", post(portal_login_handler))
        .route(
            "/api/v1/portal/auth/request-password-reset",
            post(request_password_reset_handler),
        )
        .route(
            "/api/v1/portal/auth/reset-password",
            post(reset_password_handler),
        );

    public_routes
        .merge(staff_routes)
        .merge(portal_routes)
        .with_state(state)
}

/// Wrapper handler for staff login
async fn login_handler(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<crate::dto::staff::LoginRequest>,
) -> Result<Json<crate::dto::staff::LoginResponse>> {
    crate::staff::handlers::login_handler_inner(&state, req).await
}

/// Wrapper handler for first-run bootstrap
async fn bootstrap_handler(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<crate::dto::staff::BootstrapRequest>,
) -> Result<Json<crate::dto::staff::StaffSummary>> {
    crate::staff::bootstrap::bootstrap_handler_inner(&state, req).await
}

/// Wrapper handler for listing staff accounts
async fn list_staff_handler(
    AxumState(state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedStaff>,
) -> Result<Json<Vec<crate::dto::staff::StaffSummary>>> {
    crate::staff::accounts::list_staff_handler_inner(&state, actor).await
}

/// Wrapper handler for creating a staff account
async fn create_staff_handler(
    AxumState(state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedStaff>,
    Json(req): Json<crate::dto::staff::CreateStaffRequest>,
) -> Result<Json<crate::dto::staff::CreateStaffResponse>> {
    crate::staff::accounts::create_staff_handler_inner(&state, actor, req).await
}

/// Wrapper handler for updating a staff account
async fn update_staff_handler(
    AxumState(state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedStaff>,
    Path(staff_id): Path<Uuid>,
    Json(req): Json<crate::dto::staff::UpdateStaffRequest>,
) -> Result<Json<crate::dto::staff::StaffSummary>> {
    crate::staff::accounts::update_staff_handler_inner(&state, actor, staff_id, req).await
}

/// Wrapper handler for activating or deactivating a staff account
async fn set_active_handler(
    AxumState(state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedStaff>,
    Path(staff_id): Path<Uuid>,
    Json(req): Json<crate::dto::staff::SetActiveRequest>,
) -> Result<Json<crate::dto::SuccessResponse>> {
    crate::staff::accounts::set_active_handler_inner(&state, actor, staff_id, req).await
}

/// Wrapper handler for creating a staff invite
async fn create_invite_handler(
    AxumState(state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedStaff>,
    Json(req): Json<crate::dto::staff::CreateInviteRequest>,
) -> Result<Json<crate::dto::staff::InviteResponse>> {
    crate::staff::invites::create_invite_handler_inner(&state, actor, req).await
}

/// Wrapper handler for listing staff invites
async fn list_invites_handler(
    AxumState(state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedStaff>,
) -> Result<Json<Vec<crate::dto::staff::InviteSummary>>> {
    crate::staff::invites::list_invites_handler_inner(&state, actor).await
}

/// Wrapper handler for revoking a staff invite
async fn revoke_invite_handler(
    AxumState(state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedStaff>,
    Path(invite_id): Path<Uuid>,
) -> Result<Json<crate::dto::SuccessResponse>> {
    crate::staff::invites::revoke_invite_handler_inner(&state, actor, invite_id).await
}

/// Wrapper handler for resending a staff invite
async fn resend_invite_handler(
    AxumState(state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedStaff>,
    Path(invite_id): Path<Uuid>,
) -> Result<Json<crate::dto::staff::InviteResponse>> {
    crate::staff::invites::resend_invite_handler_inner(&state, actor, invite_id).await
}

#[derive(serde::Deserialize)]
struct ValidateInviteParams {
    token: String,
}

/// Wrapper handler for the public invite validation endpoint
async fn validate_invite_handler(
    AxumState(state): AxumState<AppState>,
    Query(params): Query<ValidateInviteParams>,
) -> Result<Json<crate::dto::staff::ValidateInviteResponse>> {
    crate::staff::invites::validate_invite_handler_inner(&state, &params.token).await
}

/// Wrapper handler for registering through a staff invite
async fn register_handler(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<crate::dto::staff::RegisterRequest>,
) -> Result<Json<crate::dto::staff::StaffSummary>> {
    crate::staff::invites::register_handler_inner(&state, req).await
}

/// Wrapper handler for consuming a password setup token
async fn setup_password_handler(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<crate::dto::staff::SetupPasswordRequest>,
) -> Result<Json<crate::dto::SuccessResponse>> {
    crate::staff::handlers::setup_password_handler_inner(&state, req).await
}

/// Wrapper handler for creating a deadline
async fn create_deadline_handler(
    AxumState(state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedStaff>,
    Json(req): Json<crate::dto::deadlines::CreateDeadlineRequest>,
) -> Result<Json<entity::deadlines::Model>> {
    crate::deadlines::handlers::create_deadline_handler_inner(&state, actor, req).await
}

/// Wrapper handler for listing deadlines
async fn list_deadlines_handler(
    AxumState(state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedStaff>,
    Query(params): Query<crate::dto::deadlines::ListDeadlinesParams>,
) -> Result<Json<ApiResponse<Vec<entity::deadlines::Model>>>> {
    crate::deadlines::handlers::list_deadlines_handler_inner(&state, actor, params).await
}

/// Wrapper handler for fetching a deadline
async fn get_deadline_handler(
    AxumState(state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedStaff>,
    Path(deadline_id): Path<Uuid>,
) -> Result<Json<entity::deadlines::Model>> {
    crate::deadlines::handlers::get_deadline_handler_inner(&state, actor, deadline_id).await
}

/// Wrapper handler for updating a deadline
async fn update_deadline_handler(
    AxumState(state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedStaff>,
    Path(deadline_id): Path<Uuid>,
    Json(req): Json<crate::dto::deadlines::UpdateDeadlineRequest>,
) -> Result<Json<entity::deadlines::Model>> {
    crate::deadlines::handlers::update_deadline_handler_inner(&state, actor, deadline_id, req).await
}

/// Wrapper handler for deleting a deadline
async fn delete_deadline_handler(
    AxumState(state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedStaff>,
    Path(deadline_id): Path<Uuid>,
) -> Result<Json<crate::dto::SuccessResponse>> {
    crate::deadlines::handlers::delete_deadline_handler_inner(&state, actor, deadline_id).await
}

/// Wrapper handler for completing a deadline
async fn complete_deadline_handler(
    AxumState(state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedStaff>,
    Path(deadline_id): Path<Uuid>,
) -> Result<Json<entity::deadlines::Model>> {
    crate::deadlines::handlers::complete_deadline_handler_inner(&state, actor, deadline_id).await
}

/// Wrapper handler for reopening a deadline
async fn uncomplete_deadline_handler(
    AxumState(state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedStaff>,
    Path(deadline_id): Path<Uuid>,
) -> Result<Json<entity::deadlines::Model>> {
    crate::deadlines::handlers::uncomplete_deadline_handler_inner(&state, actor, deadline_id).await
}

/// Wrapper handler for editing a recurring series
async fn update_series_handler(
    AxumState(state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedStaff>,
    Path(deadline_id): Path<Uuid>,
    Json(req): Json<crate::dto::deadlines::SeriesUpdateRequest>,
) -> Result<Json<crate::dto::SuccessResponse>> {
    crate::deadlines::handlers::update_series_handler_inner(&state, actor, deadline_id, req).await
}

/// Wrapper handler for explicit instance generation
async fn generate_instances_handler(
    AxumState(state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedStaff>,
    Path(deadline_id): Path<Uuid>,
    Json(req): Json<crate::dto::deadlines::GenerateRequest>,
) -> Result<Json<crate::dto::deadlines::GenerateResponse>> {
    crate::deadlines::handlers::generate_instances_handler_inner(&state, actor, deadline_id, req)
        .await
}

/// Wrapper handler for creating a portal invite (staff side)
async fn create_portal_invite_handler(
    AxumState(state): AxumState<AppState>,
    Extension(actor): Extension<AuthenticatedStaff>,
    Json(req): Json<crate::dto::portal::CreatePortalInviteRequest>,
) -> Result<Json<crate::dto::portal::PortalInviteResponse>> {
    crate::portal::invites::create_portal_invite_handler_inner(&state, actor, req).await
}

/// Wrapper handler for portal registration
async fn portal_register_handler(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<crate::dto::portal::PortalRegisterRequest>,
) -> Result<Json<crate::dto::SuccessResponse>> {
    crate::portal::auth::portal_register_handler_inner(&state, req).await
}

/// Wrapper handler for portal login
async fn portal_login_handler(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<crate::dto::portal::PortalLoginRequest>,
) -> Result<Json<crate::dto::portal::PortalLoginResponse>> {
    let ip_address = client_ip(&headers);
    let user_agent = header_value(&headers, header::USER_AGENT);
    crate::portal::auth::portal_login_handler_inner(&state, req, ip_address, user_agent).await
}

/// Wrapper handler for portal logout
async fn portal_logout_handler(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<PortalContext>,
) -> Result<Json<crate::dto::SuccessResponse>> {
    crate::portal::auth::portal_logout_handler_inner(&state, ctx).await
}

/// Wrapper handler for requesting a portal password reset
async fn request_password_reset_handler(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<crate::dto::portal::RequestPasswordResetRequest>,
) -> Result<Json<crate::dto::SuccessResponse>> {
    crate::portal::auth::request_password_reset_handler_inner(&state, req).await
}

/// Wrapper handler for consuming a portal password reset token
async fn reset_password_handler(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<crate::dto::portal::ResetPasswordRequest>,
) -> Result<Json<crate::dto::SuccessResponse>> {
    crate::portal::auth::reset_password_handler_inner(&state, req).await
}

/// Wrapper handler for listing portal matters
async fn portal_list_matters_handler(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<PortalContext>,
) -> Result<Json<Vec<crate::dto::portal::PortalMatter>>> {
    crate::portal::handlers::list_matters_handler_inner(&state, ctx).await
}

/// Wrapper handler for fetching a portal matter
async fn portal_get_matter_handler(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<PortalContext>,
    Path(matter_id): Path<Uuid>,
) -> Result<Json<crate::dto::portal::PortalMatter>> {
    crate::portal::handlers::get_matter_handler_inner(&state, ctx, matter_id).await
}

/// Wrapper handler for listing portal documents
async fn portal_list_documents_handler(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<PortalContext>,
) -> Result<Json<Vec<crate::dto::portal::PortalDocument>>> {
    crate::portal::handlers::list_documents_handler_inner(&state, ctx).await
}

/// Wrapper handler for resolving a portal document download
async fn portal_download_document_handler(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<PortalContext>,
    Path(document_id): Path<Uuid>,
) -> Result<Json<crate::dto::portal::DocumentDownload>> {
    crate::portal::handlers::download_document_handler_inner(&state, ctx, document_id).await
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
}

/// Creates the health check router
pub fn create_health_router(state: AppState) -> Router {
    Router::new().route("/health", get(health_handler)).with_state(state)
}

/// Liveness probe reporting how long the server has been up.
async fn health_handler(AxumState(state): AxumState<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "uptime_seconds": state.start_time.elapsed().as_secs(),
    }))
}

/// Creates the main application router
///
/// # Arguments
///
/// * `state` - Application state containing DB pool and config
///
/// # Returns
///
/// Main router with health checks, API routes, and outer middleware
pub fn create_app_router(state: AppState) -> Router {
    let cors_origin = state.config.cors_origin.clone();

    Router::new()
        .merge(create_health_router(state.clone()))
        .merge(create_router(state))
        .layer(middleware::from_fn(move |request, next| {
            let origin = cors_origin.clone();
            crate::middleware::security_headers::cors_middleware(request, next, origin)
        }))
        .layer(middleware::from_fn(
            crate::middleware::security_headers::security_headers_middleware,
        ))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::config::AppConfig;

    fn test_config() -> AppConfig {
        AppConfig {
            database_url:     "sqlite::memory:".to_string(),
            listen_addr:      "127.0.0.1:0".to_string(),
            base_url:         "http://localhost:3000".to_string(),
            cors_origin:      None,
            initial_owner:    None,
            bootstrap_secret: None,
            jwt_secret:       "dGVzdC1zZWNyZXQ=".to_string(),
        }
    }

    #[tokio::test]
    async fn test_health_reports_uptime() {
        let db = sea_orm::Database::connect("sqlite::memory:")
            .await
            .unwrap();
        let state = AppState::new(db, test_config());

        let response = create_health_router(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert!(body["uptime_seconds"].is_u64());
    }
}
