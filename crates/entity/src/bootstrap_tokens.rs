//! Bootstrap Tokens Entity
//!
//! One-shot tokens minted from the deployment bootstrap secret, consumed to
//! create the first owner account while the staff table is empty.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bootstrap_tokens")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:          Uuid,
    #[serde(skip_serializing)]
    #[sea_orm(unique)]
    pub token_hash:  String,
    pub expires_at:  DateTimeUtc,
    pub consumed_at: Option<DateTimeUtc>,
    pub created_at:  DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// A token is usable while unexpired and never consumed.
    #[must_use]
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.consumed_at.is_none() && self.expires_at > now
    }
}
