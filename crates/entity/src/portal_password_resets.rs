//! Portal Password Resets Entity
//!
//! Single-use reset tokens for portal users. Consuming one also deletes all
//! of the user's sessions and clears the lockout counter.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "portal_password_resets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:             Uuid,
    pub portal_user_id: Uuid,
    #[serde(skip_serializing)]
    #[sea_orm(unique)]
    pub token_hash:     String,
    pub expires_at:     DateTimeUtc,
    pub used_at:        Option<DateTimeUtc>,
    pub created_at:     DateTimeUtc,
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
    /// A token is usable while unexpired and never consumed.
    #[must_use]
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.used_at.is_none() && self.expires_at > now
    }
}
