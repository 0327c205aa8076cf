//! # Praxis Entities
//!
//! SeaORM entity definitions for the Praxis data model: staff identity and
//! invites, the deadline engine tables, and the client portal realm.
//!
//! Staff accounts and portal users are independent identity realms; a person
//! acting as both is modeled as two separate accounts.

pub mod business;
pub mod clients;
pub mod matters;
pub mod documents;

pub mod staff_accounts;
pub mod staff_invites;
pub mod password_setup_tokens;
pub mod bootstrap_tokens;

pub mod deadlines;
pub mod deadline_reminders;

pub mod portal_users;
pub mod portal_sessions;
pub mod portal_invites;
pub mod portal_password_resets;
pub mod portal_activity_log;

pub use business::Business;
pub use staff_accounts::StaffRole;
