//! # Deadline Engine
//!
//! Recurring deadline templates, materialized instances, and reminder
//! fan-out. No background scheduler exists: all generation is synchronous
//! with user actions.

pub mod engine;
pub mod handlers;
