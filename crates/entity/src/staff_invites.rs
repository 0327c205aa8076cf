//! Staff Invites Entity
//!
//! Invitation records for onboarding new staff. `Expired` is a derived state:
//! a pending invite past `expires_at` reads as expired everywhere, without a
//! background job ever rewriting the stored status.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{business::Business, staff_accounts::StaffRole};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "staff_invites")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:         Uuid,
    pub email:      String,
    pub role:       StaffRole,
    pub businesses: Json,
    pub status:     InviteStatus,
    #[serde(skip_serializing)]
    #[sea_orm(unique)]
    pub token_hash: String,
    pub expires_at: DateTimeUtc,
    pub created_by: Uuid,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::staff_accounts::Entity",
        from = "Column::CreatedBy",
        to = "super::staff_accounts::Column::Id"
    )]
    Creator,
}

impl Related<super::staff_accounts::Entity> for Entity {
    fn to() -> RelationDef { Relation::Creator.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether this invite is past its expiry at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool { self.expires_at <= now }

    /// Effective status at `now`: a stored `Pending` past expiry reads as
    /// `Expired`; terminal states read as stored.
    #[must_use]
    pub fn effective_status(&self, now: DateTime<Utc>) -> InviteStatus {
        match self.status {
            InviteStatus::Pending if self.is_expired(now) => InviteStatus::Expired,
            status => status,
        }
    }

    /// A live invite is pending and unexpired; only live invites can be
    /// accepted, revoked, or resent.
    #[must_use]
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.status == InviteStatus::Pending && !self.is_expired(now)
    }

    /// Decode the stored business-scope set.
    #[must_use]
    pub fn business_set(&self) -> Vec<Business> {
        serde_json::from_value(self.businesses.clone()).unwrap_or_default()
    }
}

/// Invite lifecycle status. Transitions are Pending -> {Accepted, Revoked};
/// `Expired` is never written, only derived.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum InviteStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "revoked")]
    Revoked,
    #[sea_orm(string_value = "expired")]
    Expired,
}

impl std::fmt::Display for InviteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InviteStatus::Pending => write!(f, "pending"),
            InviteStatus::Accepted => write!(f, "accepted"),
            InviteStatus::Revoked => write!(f, "revoked"),
            InviteStatus::Expired => write!(f, "expired"),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn invite(status: InviteStatus, expires_at: DateTime<Utc>) -> Model {
        Model {
            id: Uuid::new_v4(),
            email: "new.hire@example.com".to_string(),
            role: StaffRole::StaffGcmc,
            businesses: serde_json::json!(["gcmc"]),
            status,
            token_hash: "hash".to_string(),
            expires_at,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_pending_past_expiry_reads_expired() {
        let now = Utc::now();
        let inv = invite(InviteStatus::Pending, now - Duration::hours(1));
        assert_eq!(inv.effective_status(now), InviteStatus::Expired);
        assert!(!inv.is_live(now));
    }

    #[test]
    fn test_pending_before_expiry_is_live() {
        let now = Utc::now();
        let inv = invite(InviteStatus::Pending, now + Duration::days(7));
        assert_eq!(inv.effective_status(now), InviteStatus::Pending);
        assert!(inv.is_live(now));
    }

    #[test]
    fn test_terminal_states_unaffected_by_expiry() {
        let now = Utc::now();
        let inv = invite(InviteStatus::Revoked, now - Duration::hours(1));
        assert_eq!(inv.effective_status(now), InviteStatus::Revoked);
        let inv = invite(InviteStatus::Accepted, now - Duration::hours(1));
        assert_eq!(inv.effective_status(now), InviteStatus::Accepted);
    }
}
