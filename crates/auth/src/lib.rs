//! # Authentication and Authorization
//!
//! Credential and access-control primitives shared by the staff API and the
//! client portal gateway:
//! - Argon2id password hashing and strength validation
//! - Opaque token generation and at-rest hashing
//! - JWT access tokens for staff sessions
//! - Role and business-scope access checks

pub mod access;
pub mod jwt;
pub mod password;
pub mod token;

pub use access::{
    accessible_businesses,
    business_requirement,
    is_admin,
    is_owner,
    require_business,
    validate_business_access,
    BusinessRequirement,
};
pub use jwt::{create_access_token, extract_bearer_token, validate_token, Claims};
pub use password::{hash_password, validate_password_strength, verify_password, PasswordError};
pub use token::{generate_secure_token, hash_token};
pub use secrecy;
pub use subtle;

use serde::{Deserialize, Serialize};

/// JWT signing configuration for staff access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Base64-encoded signing secret.
    pub secret:             String,
    /// Token lifetime in seconds.
    pub expiration_seconds: u64,
    pub issuer:             String,
    pub audience:           String,
}

impl JwtConfig {
    #[must_use]
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            expiration_seconds: 8 * 3600,
            issuer:             "praxis".to_string(),
            audience:           "praxis-staff".to_string(),
        }
    }
}
