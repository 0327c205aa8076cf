//! Password Setup Tokens Entity
//!
//! Single-use tokens issued so a staff account can set its first password.
//! Only the blake3 hash of the token is stored.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "password_setup_tokens")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:               Uuid,
    pub staff_account_id: Uuid,
    #[serde(skip_serializing)]
    #[sea_orm(unique)]
    pub token_hash:       String,
    pub expires_at:       DateTimeUtc,
    pub used_at:          Option<DateTimeUtc>,
    pub created_at:       DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::staff_accounts::Entity",
        from = "Column::StaffAccountId",
        to = "super::staff_accounts::Column::Id"
    )]
    StaffAccount,
}

impl Related<super::staff_accounts::Entity> for Entity {
    fn to() -> RelationDef { Relation::StaffAccount.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// A token is usable while unexpired and never consumed.
    #[must_use]
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.used_at.is_none() && self.expires_at > now
    }
}
