//! Portal Users Entity
//!
//! Client-portal login identity, one per client. Lockout state is a plain
//! counter plus the timestamp of the last failure; the gateway applies the
//! sliding-window rule on top of these two columns.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "portal_users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:                   Uuid,
    #[sea_orm(unique)]
    pub client_id:            Uuid,
    #[sea_orm(unique)]
    pub email:                String,
    #[serde(skip_serializing)]
    pub password_hash:        String,
    pub is_active:            bool,
    pub login_attempts:       i32,
    pub last_failed_login_at: Option<DateTimeUtc>,
    pub last_login_at:        Option<DateTimeUtc>,
    pub last_activity_at:     Option<DateTimeUtc>,
    pub created_at:           DateTimeUtc,
    pub updated_at:           DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id"
    )]
    Client,
    #[sea_orm(has_many = "super::portal_sessions::Entity")]
    Sessions,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef { Relation::Client.def() }
}

impl Related<super::portal_sessions::Entity> for Entity {
    fn to() -> RelationDef { Relation::Sessions.def() }
}

impl ActiveModelBehavior for ActiveModel {}
