//! Matters Entity
//!
//! A matter (case/engagement) belonging to a client.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::business::Business;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "matters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:          Uuid,
    pub client_id:   Uuid,
    pub business:    Business,
    pub title:       String,
    pub description: Option<String>,
    pub status:      MatterStatus,
    pub opened_at:   DateTimeUtc,
    pub created_at:  DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id"
    )]
    Client,
    #[sea_orm(has_many = "super::documents::Entity")]
    Documents,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef { Relation::Client.def() }
}

impl Related<super::documents::Entity> for Entity {
    fn to() -> RelationDef { Relation::Documents.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Matter lifecycle status.
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum MatterStatus {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "on_hold")]
    OnHold,
    #[sea_orm(string_value = "closed")]
    Closed,
}
