//! # Data Transfer Objects
//!
//! Request and response types for the HTTP API, grouped by surface.

pub mod deadlines;
pub mod portal;
pub mod staff;

use serde::Serialize;

/// Minimal success envelope for operations with no payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    #[must_use]
    pub fn ok() -> Self { Self { success: true } }
}
