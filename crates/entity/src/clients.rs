//! Clients Entity
//!
//! A client of either business. Kept minimal here: the portal gateway and the
//! deadline engine only need identity and business association.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::business::Business;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:         Uuid,
    pub business:   Business,
    pub name:       String,
    pub email:      String,
    pub phone:      Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::matters::Entity")]
    Matters,
    #[sea_orm(has_many = "super::documents::Entity")]
    Documents,
    #[sea_orm(has_one = "super::portal_users::Entity")]
    PortalUser,
}

impl Related<super::matters::Entity> for Entity {
    fn to() -> RelationDef { Relation::Matters.def() }
}

impl Related<super::documents::Entity> for Entity {
    fn to() -> RelationDef { Relation::Documents.def() }
}

impl Related<super::portal_users::Entity> for Entity {
    fn to() -> RelationDef { Relation::PortalUser.def() }
}

impl ActiveModelBehavior for ActiveModel {}
