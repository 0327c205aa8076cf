//! # Integration Tests for the Client Portal
//!
//! Invite-gated registration, login lockout, session invalidation, and
//! client-scoped data reads against an in-memory database.

mod common;

use auth::token::{generate_secure_token, hash_token};
use chrono::{Duration, Utc};
use common::{as_actor, create_client, create_matter, create_staff, setup_state, TEST_PASSWORD};
use entity::{
    clients,
    documents,
    portal_activity_log,
    portal_password_resets,
    portal_sessions,
    portal_users,
    Business,
    StaffRole,
};
use error::AppError;
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::Set,
    ColumnTrait,
    EntityTrait,
    PaginatorTrait,
    QueryFilter,
};
use server::{
    dto::portal::{
        CreatePortalInviteRequest,
        PortalLoginRequest,
        PortalRegisterRequest,
        RequestPasswordResetRequest,
        ResetPasswordRequest,
    },
    portal::{
        auth::{
            portal_login_handler_inner,
            portal_logout_handler_inner,
            portal_register_handler_inner,
            request_password_reset_handler_inner,
            reset_password_handler_inner,
        },
        handlers::{
            download_document_handler_inner,
            get_matter_handler_inner,
            list_documents_handler_inner,
            list_matters_handler_inner,
        },
        invites::create_portal_invite_handler_inner,
        PortalContext,
    },
    AppState,
};
use uuid::Uuid;

fn extract_token(url: &str) -> String {
    url.split("token=").nth(1).expect("URL carries a token").to_string()
}

/// Registers a portal account for a fresh client and logs it in.
async fn onboard_portal_user(
    state: &AppState,
    client_email: &str,
) -> (clients::Model, portal_users::Model) {
    let staff = create_staff(
        state,
        &format!("staff-{}", client_email),
        StaffRole::Owner,
        &[Business::Gcmc, Business::Kaj],
    )
    .await;
    let client = create_client(state, Business::Gcmc, client_email).await;

    let invite = create_portal_invite_handler_inner(state, as_actor(&staff), CreatePortalInviteRequest {
        client_id: client.id,
        email:     client_email.to_string(),
    })
    .await
    .expect("portal invite creation");

    portal_register_handler_inner(state, PortalRegisterRequest {
        token:    extract_token(&invite.0.invite_url),
        password: TEST_PASSWORD.to_string(),
    })
    .await
    .expect("portal registration");

    let user = portal_users::Entity::find()
        .filter(portal_users::Column::ClientId.eq(client.id))
        .one(&state.db)
        .await
        .unwrap()
        .expect("portal user exists");

    (client, user)
}

async fn login(state: &AppState, email: &str, password: &str) -> Result<String, AppError> {
    let response = portal_login_handler_inner(
        state,
        PortalLoginRequest {
            email:    email.to_string(),
            password: password.to_string(),
        },
        Some("203.0.113.7".to_string()),
        Some("praxis-tests".to_string()),
    )
    .await?;
    Ok(response.0.session_token)
}

async fn context_for(state: &AppState, user: &portal_users::Model, token: &str) -> PortalContext {
    let session = portal_sessions::Entity::find()
        .filter(portal_sessions::Column::TokenHash.eq(hash_token(token)))
        .one(&state.db)
        .await
        .unwrap()
        .expect("session exists");
    PortalContext {
        portal_user_id: user.id,
        client_id:      user.client_id,
        email:          user.email.clone(),
        session_id:     session.id,
    }
}

async fn seed_document(state: &AppState, client: &clients::Model, file_name: &str) -> documents::Model {
    documents::ActiveModel {
        id:           Set(Uuid::new_v4()),
        client_id:    Set(client.id),
        matter_id:    Set(None),
        file_name:    Set(file_name.to_string()),
        content_type: Set("application/pdf".to_string()),
        size_bytes:   Set(4096),
        storage_path: Set(format!("blobs/{}", file_name)),
        uploaded_at:  Set(Utc::now()),
    }
    .insert(&state.db)
    .await
    .expect("document insert")
}

#[tokio::test]
async fn test_portal_invite_is_single_use() {
    let state = setup_state().await;
    let staff = create_staff(&state, "staff@praxis.test", StaffRole::Owner, &[
        Business::Gcmc,
        Business::Kaj,
    ])
    .await;
    let client = create_client(&state, Business::Gcmc, "client@example.com").await;

    let invite = create_portal_invite_handler_inner(&state, as_actor(&staff), CreatePortalInviteRequest {
        client_id: client.id,
        email:     "client@example.com".to_string(),
    })
    .await
    .expect("invite creation");
    let token = extract_token(&invite.0.invite_url);

    portal_register_handler_inner(&state, PortalRegisterRequest {
        token:    token.clone(),
        password: TEST_PASSWORD.to_string(),
    })
    .await
    .expect("first registration");

    let err = portal_register_handler_inner(&state, PortalRegisterRequest {
        token,
        password: TEST_PASSWORD.to_string(),
    })
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest { .. }));
}

#[tokio::test]
async fn test_portal_invite_requires_business_scope() {
    let state = setup_state().await;
    let kaj_staff = create_staff(&state, "kaj@praxis.test", StaffRole::KajManager, &[
        Business::Kaj,
    ])
    .await;
    let gcmc_client = create_client(&state, Business::Gcmc, "client@example.com").await;

    let err = create_portal_invite_handler_inner(&state, as_actor(&kaj_staff), CreatePortalInviteRequest {
        client_id: gcmc_client.id,
        email:     "client@example.com".to_string(),
    })
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));
}

#[tokio::test]
async fn test_one_portal_account_per_client() {
    let state = setup_state().await;
    let (client, _user) = onboard_portal_user(&state, "client@example.com").await;
    let staff = create_staff(&state, "another@praxis.test", StaffRole::Owner, &[
        Business::Gcmc,
        Business::Kaj,
    ])
    .await;

    let err = create_portal_invite_handler_inner(&state, as_actor(&staff), CreatePortalInviteRequest {
        client_id: client.id,
        email:     "second@example.com".to_string(),
    })
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict { .. }));
}

#[tokio::test]
async fn test_login_lockout_after_five_failures() {
    let state = setup_state().await;
    let (_client, user) = onboard_portal_user(&state, "client@example.com").await;

    for _ in 0..5 {
        let err = login(&state, &user.email, "WrongPassword123").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized { .. }));
    }

    // Locked: even the correct password is rejected, with a retry hint,
    // and without going through verification.
    let err = login(&state, &user.email, TEST_PASSWORD).await.unwrap_err();
    match err {
        AppError::RateLimit { retry_after, .. } => {
            assert!(retry_after > 0);
            assert!(retry_after <= 900);
        },
        other => panic!("expected RateLimit, got {:?}", other),
    }
}

#[tokio::test]
async fn test_lockout_window_elapse_resets_counter() {
    let state = setup_state().await;
    let (_client, user) = onboard_portal_user(&state, "client@example.com").await;

    for _ in 0..5 {
        let _ = login(&state, &user.email, "WrongPassword123").await.unwrap_err();
    }

    // Age the last failure past the window directly in storage.
    portal_users::Entity::update_many()
        .col_expr(
            portal_users::Column::LastFailedLoginAt,
            sea_orm::sea_query::Expr::value(Some(Utc::now() - Duration::minutes(16))),
        )
        .filter(portal_users::Column::Id.eq(user.id))
        .exec(&state.db)
        .await
        .unwrap();

    let token = login(&state, &user.email, TEST_PASSWORD)
        .await
        .expect("login succeeds once the window has elapsed");
    assert!(!token.is_empty());

    // Success resets the counter and stamps last_login_at.
    let refreshed = portal_users::Entity::find_by_id(user.id)
        .one(&state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(refreshed.login_attempts, 0);
    assert!(refreshed.last_login_at.is_some());
}

#[tokio::test]
async fn test_logout_deletes_the_session() {
    let state = setup_state().await;
    let (_client, user) = onboard_portal_user(&state, "client@example.com").await;

    let token = login(&state, &user.email, TEST_PASSWORD).await.expect("login");
    let ctx = context_for(&state, &user, &token).await;

    portal_logout_handler_inner(&state, ctx).await.expect("logout");

    let sessions = portal_sessions::Entity::find()
        .filter(portal_sessions::Column::PortalUserId.eq(user.id))
        .count(&state.db)
        .await
        .unwrap();
    assert_eq!(sessions, 0);
}

#[tokio::test]
async fn test_reset_request_does_not_reveal_account_existence() {
    let state = setup_state().await;
    onboard_portal_user(&state, "client@example.com").await;

    let known = request_password_reset_handler_inner(&state, RequestPasswordResetRequest {
        email: "client@example.com".to_string(),
    })
    .await
    .expect("request for known email");
    let unknown = request_password_reset_handler_inner(&state, RequestPasswordResetRequest {
        email: "ghost@example.com".to_string(),
    })
    .await
    .expect("request for unknown email");
    assert_eq!(known.0.success, unknown.0.success);

    // Only the known email produced a token row.
    let tokens = portal_password_resets::Entity::find().count(&state.db).await.unwrap();
    assert_eq!(tokens, 1);
}

#[tokio::test]
async fn test_password_reset_invalidates_sessions_and_lockout() {
    let state = setup_state().await;
    let (_client, user) = onboard_portal_user(&state, "client@example.com").await;

    login(&state, &user.email, TEST_PASSWORD).await.expect("session one");
    login(&state, &user.email, TEST_PASSWORD).await.expect("session two");

    // Some failed attempts linger on the counter.
    for _ in 0..3 {
        let _ = login(&state, &user.email, "WrongPassword123").await.unwrap_err();
    }

    // Seed a reset token with a known plaintext.
    let plaintext = generate_secure_token();
    portal_password_resets::ActiveModel {
        id:             Set(Uuid::new_v4()),
        portal_user_id: Set(user.id),
        token_hash:     Set(hash_token(&plaintext)),
        expires_at:     Set(Utc::now() + Duration::minutes(60)),
        used_at:        Set(None),
        created_at:     Set(Utc::now()),
    }
    .insert(&state.db)
    .await
    .unwrap();

    reset_password_handler_inner(&state, ResetPasswordRequest {
        token:    plaintext.clone(),
        password: "BrandNewPassword123".to_string(),
    })
    .await
    .expect("reset should succeed");

    // Every session is gone and the lockout counter is cleared.
    let sessions = portal_sessions::Entity::find()
        .filter(portal_sessions::Column::PortalUserId.eq(user.id))
        .count(&state.db)
        .await
        .unwrap();
    assert_eq!(sessions, 0);
    let refreshed = portal_users::Entity::find_by_id(user.id)
        .one(&state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(refreshed.login_attempts, 0);

    // The token is spent.
    let err = reset_password_handler_inner(&state, ResetPasswordRequest {
        token:    plaintext,
        password: "YetAnotherPassword123".to_string(),
    })
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest { .. }));

    // Old password dead, new password works.
    let err = login(&state, &user.email, TEST_PASSWORD).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized { .. }));
    login(&state, &user.email, "BrandNewPassword123").await.expect("new password");
}

#[tokio::test]
async fn test_portal_reads_are_scoped_to_the_client() {
    let state = setup_state().await;
    let (client_a, user_a) = onboard_portal_user(&state, "alpha@example.com").await;
    let (client_b, _user_b) = onboard_portal_user(&state, "beta@example.com").await;

    let matter_a = create_matter(&state, &client_a, "Alpha annual accounts").await;
    let matter_b = create_matter(&state, &client_b, "Beta training plan").await;
    seed_document(&state, &client_a, "alpha.pdf").await;
    let doc_b = seed_document(&state, &client_b, "beta.pdf").await;

    let token = login(&state, &user_a.email, TEST_PASSWORD).await.expect("login");
    let ctx = context_for(&state, &user_a, &token).await;

    let matters = list_matters_handler_inner(&state, ctx.clone()).await.unwrap();
    assert_eq!(matters.0.len(), 1);
    assert_eq!(matters.0[0].id, matter_a.id);

    let docs = list_documents_handler_inner(&state, ctx.clone()).await.unwrap();
    assert_eq!(docs.0.len(), 1);
    assert_eq!(docs.0[0].file_name, "alpha.pdf");

    // Another client's ids resolve to NOT_FOUND, not FORBIDDEN.
    let err = get_matter_handler_inner(&state, ctx.clone(), matter_b.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
    let err = download_document_handler_inner(&state, ctx.clone(), doc_b.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));

    // Own document resolves and the download is recorded.
    let docs_a = list_documents_handler_inner(&state, ctx.clone()).await.unwrap();
    let download = download_document_handler_inner(&state, ctx.clone(), docs_a.0[0].id)
        .await
        .expect("own download");
    assert_eq!(download.0.storage_path, "blobs/alpha.pdf");

    let downloads = portal_activity_log::Entity::find()
        .filter(portal_activity_log::Column::PortalUserId.eq(user_a.id))
        .filter(portal_activity_log::Column::Action.eq("document_download"))
        .count(&state.db)
        .await
        .unwrap();
    assert_eq!(downloads, 1);
}
