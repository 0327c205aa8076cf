//! # Client Portal Gateway
//!
//! Self-service access for clients of either practice. Portal identity is
//! wholly separate from staff identity: opaque database-backed sessions
//! instead of JWTs, and every data read structurally scoped to the
//! client the portal user belongs to.

pub mod activity;
pub mod auth;
pub mod handlers;
pub mod invites;
pub mod middleware;

pub use middleware::PortalContext;
