//! # Deadline Data Transfer Objects

use chrono::NaiveDate;
use entity::{
    deadlines::{DeadlineType, Priority, RecurrencePattern},
    Business,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request body for creating a deadline (one-off or recurring template)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateDeadlineRequest {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,

    pub description: Option<String>,

    pub deadline_type: DeadlineType,

    pub client_id: Option<Uuid>,

    pub matter_id: Option<Uuid>,

    pub business: Option<Business>,

    pub assigned_staff_id: Option<Uuid>,

    pub due_date: NaiveDate,

    pub priority: Priority,

    #[serde(default = "RecurrencePattern::none")]
    pub recurrence_pattern: RecurrencePattern,

    pub recurrence_end_date: Option<NaiveDate>,
}

/// Request body for updating a single deadline
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateDeadlineRequest {
    #[validate(length(min = 1, max = 255, message = "Title must not be empty"))]
    pub title: Option<String>,

    pub description: Option<String>,

    pub deadline_type: Option<DeadlineType>,

    pub client_id: Option<Uuid>,

    pub matter_id: Option<Uuid>,

    pub business: Option<Business>,

    pub assigned_staff_id: Option<Uuid>,

    /// Changing the due date regenerates the reminder set
    pub due_date: Option<NaiveDate>,

    pub priority: Option<Priority>,
}

/// Request body for editing a recurring series.
///
/// Applies to the template and its incomplete instances; completed
/// instances are immutable history. Due dates are per-occurrence and not
/// part of a series edit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct SeriesUpdateRequest {
    #[validate(length(min = 1, max = 255, message = "Title must not be empty"))]
    pub title: Option<String>,

    pub description: Option<String>,

    pub deadline_type: Option<DeadlineType>,

    pub priority: Option<Priority>,

    pub assigned_staff_id: Option<Uuid>,

    /// New recurrence end bound; applies to the template row only, since
    /// instances never carry recurrence fields
    pub recurrence_end_date: Option<NaiveDate>,
}

/// Request body for explicit forward generation of recurrence instances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Validate)]
pub struct GenerateRequest {
    /// How many months ahead to materialize (default 12)
    #[validate(range(min = 1, max = 36, message = "months_ahead must be between 1 and 36"))]
    pub months_ahead: Option<u32>,
}

/// Response for forward generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenerateResponse {
    pub success:   bool,
    /// Number of new instances materialized
    pub generated: usize,
}

/// Query parameters for deadline listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListDeadlinesParams {
    /// Restrict to one business (must be within the caller's scope)
    pub business: Option<Business>,

    /// Include completed deadlines (default false)
    #[serde(default)]
    pub include_completed: bool,

    pub page: Option<u64>,

    pub per_page: Option<u64>,
}
