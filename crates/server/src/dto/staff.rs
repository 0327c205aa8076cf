//! # Staff Data Transfer Objects
//!
//! Request and response types for staff authentication, account
//! administration, invites, and bootstrap.

use chrono::{DateTime, Utc};
use entity::{staff_accounts, staff_invites, Business, StaffRole};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request body for staff login
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct LoginRequest {
    /// Staff email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Staff password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Staff account as exposed over the API (no credential material)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaffSummary {
    pub id:                  Uuid,
    pub name:                String,
    pub email:               String,
    pub role:                StaffRole,
    pub businesses:          Vec<Business>,
    pub is_active:           bool,
    pub can_view_financials: bool,
    /// Whether the account has a usable credential yet
    pub has_password:        bool,
}

impl From<&staff_accounts::Model> for StaffSummary {
    fn from(model: &staff_accounts::Model) -> Self {
        Self {
            id:                  model.id,
            name:                model.name.clone(),
            email:               model.email.clone(),
            role:                model.role,
            businesses:          model.business_set(),
            is_active:           model.is_active,
            can_view_financials: model.can_view_financials,
            has_password:        model.password_hash.is_some(),
        }
    }
}

/// Response for successful staff authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponse {
    pub success:      bool,
    /// JWT access token for API requests
    pub access_token: String,
    /// Token lifetime in seconds
    pub expires_in:   u64,
    pub staff:        StaffSummary,
}

/// Request body for creating a staff account directly
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateStaffRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub role: StaffRole,

    pub businesses: Vec<Business>,

    #[serde(default)]
    pub can_view_financials: bool,

    /// When present, set directly; when absent, a one-shot password setup
    /// token is issued instead.
    pub password: Option<String>,
}

/// Response for staff creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateStaffResponse {
    pub success:   bool,
    pub staff:     StaffSummary,
    /// Present only when no password was supplied at creation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup_url: Option<String>,
}

/// Request body for updating a staff account
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateStaffRequest {
    #[validate(length(min = 1, max = 255, message = "Name must not be empty"))]
    pub name: Option<String>,

    pub role: Option<StaffRole>,

    pub businesses: Option<Vec<Business>>,

    pub can_view_financials: Option<bool>,
}

/// Request body for activating or deactivating an account
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

/// Request body for consuming a password setup token
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct SetupPasswordRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,

    #[validate(length(min = 8, max = 256, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Request body for creating a staff invite
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateInviteRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub role: StaffRole,

    pub businesses: Vec<Business>,

    /// Days until expiry (1 to 30, default 7)
    #[validate(range(min = 1, max = 30, message = "Expiry must be between 1 and 30 days"))]
    pub expires_in_days: Option<i64>,
}

/// Staff invite as exposed over the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InviteSummary {
    pub id:         Uuid,
    pub email:      String,
    pub role:       StaffRole,
    pub businesses: Vec<Business>,
    pub status:     staff_invites::InviteStatus,
    pub expires_at: DateTime<Utc>,
}

impl InviteSummary {
    #[must_use]
    pub fn from_model(model: &staff_invites::Model, now: DateTime<Utc>) -> Self {
        Self {
            id:         model.id,
            email:      model.email.clone(),
            role:       model.role,
            businesses: model.business_set(),
            status:     model.effective_status(now),
            expires_at: model.expires_at,
        }
    }
}

/// Response for invite creation and resend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InviteResponse {
    pub success:    bool,
    pub invite:     InviteSummary,
    /// Registration link carrying the one-shot token
    pub invite_url: String,
}

/// Response for the public invite validation endpoint.
///
/// Revoked, expired, and unknown tokens all produce the same
/// `{valid: false}` shape so the endpoint cannot be used for enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidateInviteResponse {
    pub valid: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<StaffRole>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub businesses: Option<Vec<Business>>,
}

impl ValidateInviteResponse {
    #[must_use]
    pub fn invalid() -> Self {
        Self {
            valid:      false,
            email:      None,
            role:       None,
            businesses: None,
        }
    }
}

/// Request body for registering through an invite
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,

    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 8, max = 256, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Request body for the one-shot bootstrap of the first owner account
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct BootstrapRequest {
    /// Bootstrap token or the deployment bootstrap secret
    #[validate(length(min = 1, message = "Bootstrap secret is required"))]
    pub secret: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 8, max = 256, message = "Password must be at least 8 characters"))]
    pub password: String,
}
