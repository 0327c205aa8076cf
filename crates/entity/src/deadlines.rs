//! Deadlines Entity
//!
//! Compliance and engagement deadlines for both businesses. A recurring
//! deadline is stored as a template row (`recurrence_pattern != none`,
//! `parent_deadline_id` null) plus materialized instance rows pointing back
//! at the template. Instances always carry `recurrence_pattern = none`.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::business::Business;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "deadlines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:                  Uuid,
    pub title:               String,
    pub description:         Option<String>,
    pub deadline_type:       DeadlineType,
    pub client_id:           Option<Uuid>,
    pub matter_id:           Option<Uuid>,
    pub business:            Option<Business>,
    pub assigned_staff_id:   Option<Uuid>,
    pub due_date:            Date,
    pub priority:            Priority,
    pub recurrence_pattern:  RecurrencePattern,
    pub recurrence_end_date: Option<Date>,
    pub parent_deadline_id:  Option<Uuid>,
    pub is_completed:        bool,
    pub completed_at:        Option<DateTimeUtc>,
    pub completed_by_id:     Option<Uuid>,
    pub created_by_id:       Uuid,
    pub created_at:          DateTimeUtc,
    pub updated_at:          DateTimeUtc,
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
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentDeadlineId",
        to = "Column::Id"
    )]
    Parent,
    #[sea_orm(has_many = "super::deadline_reminders::Entity")]
    Reminders,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef { Relation::Client.def() }
}

impl Related<super::deadline_reminders::Entity> for Entity {
    fn to() -> RelationDef { Relation::Reminders.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Instance rows point at their template; templates and one-offs do not.
    #[must_use]
    pub fn is_instance(&self) -> bool { self.parent_deadline_id.is_some() }

    /// A recurring template carries a pattern and no parent.
    #[must_use]
    pub fn is_recurring_template(&self) -> bool {
        self.recurrence_pattern != RecurrencePattern::None && self.parent_deadline_id.is_none()
    }

    /// Overdue means incomplete with a due date strictly before today (UTC).
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_completed && self.due_date < now.date_naive()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum DeadlineType {
    #[sea_orm(string_value = "filing")]
    Filing,
    #[sea_orm(string_value = "renewal")]
    Renewal,
    #[sea_orm(string_value = "payment")]
    Payment,
    #[sea_orm(string_value = "submission")]
    Submission,
    #[sea_orm(string_value = "meeting")]
    Meeting,
    #[sea_orm(string_value = "followup")]
    Followup,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[sea_orm(string_value = "low")]
    Low,
    #[sea_orm(string_value = "normal")]
    Normal,
    #[sea_orm(string_value = "high")]
    High,
    #[sea_orm(string_value = "urgent")]
    Urgent,
}

/// Recurrence cadence for a deadline template. `None` marks one-off
/// deadlines and every materialized instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum RecurrencePattern {
    #[sea_orm(string_value = "none")]
    None,
    #[sea_orm(string_value = "daily")]
    Daily,
    #[sea_orm(string_value = "weekly")]
    Weekly,
    #[sea_orm(string_value = "monthly")]
    Monthly,
    #[sea_orm(string_value = "quarterly")]
    Quarterly,
    #[sea_orm(string_value = "annually")]
    Annually,
}

impl RecurrencePattern {
    /// Serde default for request payloads that omit the pattern.
    #[must_use]
    pub fn none() -> Self { Self::None }

    #[must_use]
    pub fn is_none(self) -> bool { self == Self::None }

    #[must_use]
    pub fn is_recurring(self) -> bool { self != Self::None }
}
