//! Portal Sessions Entity
//!
//! DB-backed bearer sessions for the client portal. Expiry is sliding: the
//! session middleware pushes `expires_at` forward on each authenticated
//! request. Only the blake3 hash of the session token is stored.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "portal_sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:               Uuid,
    pub portal_user_id:   Uuid,
    #[serde(skip_serializing)]
    #[sea_orm(unique)]
    pub token_hash:       String,
    pub expires_at:       DateTimeUtc,
    pub created_at:       DateTimeUtc,
    pub last_activity_at: DateTimeUtc,
    pub ip_address:       Option<String>,
    pub user_agent:       Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::portal_users::Entity",
        from = "Column::PortalUserId",
        to = "super::portal_users::Column::Id"
    )]
    PortalUser,
}

impl Related<super::portal_users::Entity> for Entity {
    fn to() -> RelationDef { Relation::PortalUser.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool { self.expires_at <= now }
}
