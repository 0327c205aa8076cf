//! # HTTP Middleware

pub mod auth;
pub mod security_headers;
