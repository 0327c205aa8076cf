//! Documents Entity
//!
//! Document metadata attached to a client (and optionally a matter). The blob
//! itself lives in external storage; only the handle is modeled here.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:           Uuid,
    pub client_id:    Uuid,
    pub matter_id:    Option<Uuid>,
    pub file_name:    String,
    pub content_type: String,
    pub size_bytes:   i64,
    pub storage_path: String,
    pub uploaded_at:  DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id"
    )]
    Client,
    #[sea_orm(
        belongs_to = "super::matters::Entity",
        from = "Column::MatterId",
        to = "super::matters::Column::Id"
    )]
    Matter,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef { Relation::Client.def() }
}

impl Related<super::matters::Entity> for Entity {
    fn to() -> RelationDef { Relation::Matter.def() }
}

impl ActiveModelBehavior for ActiveModel {}
