//! # Staff API
//!
//! Authentication, account administration, invite lifecycle, and the
//! one-shot bootstrap of the first owner account.

pub mod accounts;
pub mod bootstrap;
pub mod handlers;
pub mod invites;
