//! # Portal Data Transfer Objects

use chrono::{DateTime, Utc};
use entity::{documents, matters};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request body for portal registration through an invite
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct PortalRegisterRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,

    #[validate(length(min = 8, max = 256, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Request body for portal login
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct PortalLoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response for successful portal login
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortalLoginResponse {
    pub success:       bool,
    /// Opaque bearer session token
    pub session_token: String,
    /// Current sliding expiry of the session
    pub expires_at:    DateTime<Utc>,
}

/// Request body for asking for a password reset link.
///
/// The response is uniform regardless of whether the email exists.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct RequestPasswordResetRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Request body for consuming a password reset token
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,

    #[validate(length(min = 8, max = 256, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Request body for staff creating a portal invite
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreatePortalInviteRequest {
    pub client_id: Uuid,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Response for portal invite creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortalInviteResponse {
    pub success:    bool,
    pub invite_url: String,
    pub expires_at: DateTime<Utc>,
}

/// Matter as exposed to the portal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortalMatter {
    pub id:        Uuid,
    pub title:     String,
    pub status:    matters::MatterStatus,
    pub opened_at: DateTime<Utc>,
}

impl From<&matters::Model> for PortalMatter {
    fn from(model: &matters::Model) -> Self {
        Self {
            id:        model.id,
            title:     model.title.clone(),
            status:    model.status.clone(),
            opened_at: model.opened_at,
        }
    }
}

/// Document metadata as exposed to the portal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortalDocument {
    pub id:           Uuid,
    pub matter_id:    Option<Uuid>,
    pub file_name:    String,
    pub content_type: String,
    pub size_bytes:   i64,
    pub uploaded_at:  DateTime<Utc>,
}

impl From<&documents::Model> for PortalDocument {
    fn from(model: &documents::Model) -> Self {
        Self {
            id:           model.id,
            matter_id:    model.matter_id,
            file_name:    model.file_name.clone(),
            content_type: model.content_type.clone(),
            size_bytes:   model.size_bytes,
            uploaded_at:  model.uploaded_at,
        }
    }
}

/// Download handle for a document (blob storage is external)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentDownload {
    pub id:           Uuid,
    pub file_name:    String,
    pub content_type: String,
    pub storage_path: String,
}
