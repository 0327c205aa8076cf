//! Deadline Reminders Entity
//!
//! Reminder rows generated alongside a deadline at fixed day offsets before
//! its due date. Offsets that would land in the past are never persisted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "deadline_reminders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:            Uuid,
    pub deadline_id:   Uuid,
    /// Days before the due date this reminder fires (30, 14, 7, 1, 0).
    pub days_before:   i32,
    pub reminder_date: Date,
    pub created_at:    DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::deadlines::Entity",
        from = "Column::DeadlineId",
        to = "super::deadlines::Column::Id"
    )]
    Deadline,
}

impl Related<super::deadlines::Entity> for Entity {
    fn to() -> RelationDef { Relation::Deadline.def() }
}

impl ActiveModelBehavior for ActiveModel {}
