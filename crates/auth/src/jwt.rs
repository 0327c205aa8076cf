//! JWT access tokens for staff sessions.
//!
//! Tokens carry identity only. Role and business scope are reloaded from the
//! database on every request, so a claim never grants access the account no
//! longer has.

use std::{
    collections::HashSet,
    time::{Duration, SystemTime},
};

use error::{AppError, Result};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::JwtConfig;

/// JWT claims for a staff access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (staff account ID)
    pub sub: String,

    /// Staff email
    pub email: String,

    /// Token issuer
    pub iss: String,

    /// Token audience
    pub aud: String,

    /// Expiration time (Unix timestamp)
    pub exp: u64,

    /// Issued at (Unix timestamp)
    pub iat: u64,

    /// Unique token ID
    pub jti: String,
}

/// Creates a new staff access token.
///
/// # Errors
///
/// Returns an error if the secret is invalid or encoding fails.
pub fn create_access_token(config: &JwtConfig, staff_id: Uuid, email: &str) -> Result<String> {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_err(|e| AppError::internal(format!("Failed to get current time: {}", e)))?;

    let issued_at = now.as_secs();
    let expiration = now + Duration::from_secs(config.expiration_seconds);

    let claims = Claims {
        sub:   staff_id.to_string(),
        email: email.to_string(),
        iss:   config.issuer.clone(),
        aud:   config.audience.clone(),
        exp:   expiration.as_secs(),
        iat:   issued_at,
        jti:   Uuid::new_v4().to_string(),
    };

    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_base64_secret(&config.secret)
            .map_err(|e| AppError::config(format!("Invalid JWT secret: {}", e)))?,
    )
    .map_err(|e| AppError::internal(format!("Failed to encode token: {}", e)))?;

    Ok(token)
}

/// Validates a staff access token and returns its claims.
///
/// # Errors
///
/// Returns `Unauthorized` if the token is expired, malformed, or signed for
/// a different issuer or audience.
pub fn validate_token(config: &JwtConfig, token: &str) -> Result<Claims> {
    let decoding_key = DecodingKey::from_base64_secret(&config.secret)
        .map_err(|e| AppError::config(format!("Invalid JWT secret: {}", e)))?;

    let mut validation = Validation::default();
    let mut iss_set = HashSet::new();
    iss_set.insert(config.issuer.clone());
    validation.iss = Some(iss_set);
    let mut aud = HashSet::new();
    aud.insert(config.audience.clone());
    validation.aud = Some(aud);
    validation.validate_exp = true;

    let claims = jsonwebtoken::decode(token, &decoding_key, &validation)
        .map_err(|e| AppError::unauthorized(format!("Token validation failed: {}", e)))?;

    Ok(claims.claims)
}

/// Extracts the Bearer token from an Authorization header value.
#[must_use]
pub fn extract_bearer_token(auth_header: &str) -> Option<String> {
    let token = auth_header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}
