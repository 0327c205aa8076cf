//! Portal Activity Log Entity
//!
//! Append-only audit trail of portal actions. Writes are best-effort: a
//! failed insert is logged and swallowed, never surfaced to the client.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "portal_activity_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:             Uuid,
    pub portal_user_id: Uuid,
    pub action:         String,
    pub detail:         Option<Json>,
    pub ip_address:     Option<String>,
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
