//! Recurrence arithmetic and instance materialization.
//!
//! All functions are generic over `ConnectionTrait` so callers can run them
//! inside the transaction that wraps the surrounding user action. The
//! `(parent_deadline_id, due_date)` unique index is the storage backstop
//! for idempotence; the existence checks here are advisory fast paths.

use chrono::{Days, Months, NaiveDate, Utc};
use entity::{
    deadline_reminders,
    deadlines::{self, RecurrencePattern},
};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::Set,
    ColumnTrait,
    ConnectionTrait,
    EntityTrait,
    PaginatorTrait,
    QueryFilter,
};
use uuid::Uuid;

use crate::Result;

/// Reminder offsets in days before the due date.
pub const REMINDER_OFFSETS: [u64; 5] = [30, 14, 7, 1, 0];

/// Hard cap on instances materialized by a single generation pass.
pub const MAX_GENERATED_INSTANCES: usize = 200;

/// Default forward-generation horizon.
pub const DEFAULT_MONTHS_AHEAD: u32 = 12;

/// Default end bound for open-ended recurrences, counted from the
/// template's due date.
const DEFAULT_END_BOUND_MONTHS: u32 = 24;

/// The next occurrence after `date` for a recurrence pattern.
///
/// Month-based patterns clamp to the end of shorter months, which is
/// chrono's documented behavior: 2025-01-31 plus one month is 2025-02-28.
#[must_use]
pub fn next_occurrence(date: NaiveDate, pattern: RecurrencePattern) -> Option<NaiveDate> {
    match pattern {
        RecurrencePattern::None => None,
        RecurrencePattern::Daily => date.checked_add_days(Days::new(1)),
        RecurrencePattern::Weekly => date.checked_add_days(Days::new(7)),
        RecurrencePattern::Monthly => date.checked_add_months(Months::new(1)),
        RecurrencePattern::Quarterly => date.checked_add_months(Months::new(3)),
        RecurrencePattern::Annually => date.checked_add_months(Months::new(12)),
    }
}

/// Last date forward pre-generation may materialize instances for. An
/// open-ended recurrence defaults to two years past the template's due
/// date; lazy completion-triggered generation does not use this bound.
#[must_use]
pub fn end_bound(template: &deadlines::Model) -> NaiveDate {
    template.recurrence_end_date.unwrap_or_else(|| {
        template
            .due_date
            .checked_add_months(Months::new(DEFAULT_END_BOUND_MONTHS))
            .unwrap_or(template.due_date)
    })
}

/// Creates the reminder set for a deadline. Only strictly future reminder
/// dates are persisted; offsets already in the past are skipped, not
/// clamped.
pub async fn create_reminders<C: ConnectionTrait>(
    conn: &C,
    deadline_id: Uuid,
    due_date: NaiveDate,
) -> Result<usize> {
    let now = Utc::now();
    let today = now.date_naive();
    let mut created = 0;

    for offset in REMINDER_OFFSETS {
        let Some(reminder_date) = due_date.checked_sub_days(Days::new(offset)) else {
            continue;
        };
        if reminder_date <= today {
            continue;
        }
        deadline_reminders::ActiveModel {
            id:            Set(Uuid::new_v4()),
            deadline_id:   Set(deadline_id),
            days_before:   Set(offset as i32),
            reminder_date: Set(reminder_date),
            created_at:    Set(now),
        }
        .insert(conn)
        .await?;
        created += 1;
    }

    Ok(created)
}

/// Deletes and regenerates the reminder set for a deadline, used when its
/// due date changes.
pub async fn regenerate_reminders<C: ConnectionTrait>(
    conn: &C,
    deadline_id: Uuid,
    due_date: NaiveDate,
) -> Result<usize> {
    deadline_reminders::Entity::delete_many()
        .filter(deadline_reminders::Column::DeadlineId.eq(deadline_id))
        .exec(conn)
        .await?;
    create_reminders(conn, deadline_id, due_date).await
}

/// Whether an instance of `template` already exists for `due_date`.
async fn instance_exists<C: ConnectionTrait>(
    conn: &C,
    template_id: Uuid,
    due_date: NaiveDate,
) -> Result<bool> {
    let count = deadlines::Entity::find()
        .filter(deadlines::Column::ParentDeadlineId.eq(template_id))
        .filter(deadlines::Column::DueDate.eq(due_date))
        .count(conn)
        .await?;
    Ok(count > 0)
}

/// Materializes one instance of a template for `due_date`, with its
/// reminder set. Instances never carry a recurrence of their own.
async fn insert_instance<C: ConnectionTrait>(
    conn: &C,
    template: &deadlines::Model,
    due_date: NaiveDate,
) -> Result<deadlines::Model> {
    let now = Utc::now();
    let instance = deadlines::ActiveModel {
        id:                  Set(Uuid::new_v4()),
        title:               Set(template.title.clone()),
        description:         Set(template.description.clone()),
        deadline_type:       Set(template.deadline_type),
        client_id:           Set(template.client_id),
        matter_id:           Set(template.matter_id),
        business:            Set(template.business),
        assigned_staff_id:   Set(template.assigned_staff_id),
        due_date:            Set(due_date),
        priority:            Set(template.priority),
        recurrence_pattern:  Set(RecurrencePattern::None),
        recurrence_end_date: Set(None),
        parent_deadline_id:  Set(Some(template.id)),
        is_completed:        Set(false),
        completed_at:        Set(None),
        completed_by_id:     Set(None),
        created_by_id:       Set(template.created_by_id),
        created_at:          Set(now),
        updated_at:          Set(now),
    }
    .insert(conn)
    .await?;

    create_reminders(conn, instance.id, due_date).await?;

    Ok(instance)
}

/// Materializes future instances of a recurring template up to a horizon.
///
/// The horizon is the earlier of the recurrence end bound and
/// `months_ahead` months from today. Occurrences strictly beyond the
/// horizon stop generation; the pass is capped at
/// [`MAX_GENERATED_INSTANCES`] regardless of pattern density.
pub async fn generate_recurring_instances<C: ConnectionTrait>(
    conn: &C,
    template: &deadlines::Model,
    months_ahead: u32,
) -> Result<usize> {
    if template.recurrence_pattern.is_none() {
        return Ok(0);
    }

    let today = Utc::now().date_naive();
    let horizon_by_window = today
        .checked_add_months(Months::new(months_ahead))
        .unwrap_or(today);
    let horizon = horizon_by_window.min(end_bound(template));

    let mut generated = 0;
    let mut date = template.due_date;

    loop {
        let Some(next) = next_occurrence(date, template.recurrence_pattern) else {
            break;
        };
        if next > horizon {
            break;
        }
        if generated >= MAX_GENERATED_INSTANCES {
            break;
        }

        if !instance_exists(conn, template.id, next).await? {
            insert_instance(conn, template, next).await?;
            generated += 1;
        }

        date = next;
    }

    Ok(generated)
}

/// Lazily materializes the single next instance after a completed one.
///
/// Called when an instance under an actively recurring template is
/// completed. Only an explicit recurrence end date bounds this step; an
/// open-ended series keeps producing one successor per completion, so an
/// actively worked series never runs dry. Does nothing when the next
/// occurrence is already present.
pub async fn generate_next_instance<C: ConnectionTrait>(
    conn: &C,
    template: &deadlines::Model,
    after: NaiveDate,
) -> Result<Option<deadlines::Model>> {
    if template.recurrence_pattern.is_none() {
        return Ok(None);
    }

    let Some(next) = next_occurrence(after, template.recurrence_pattern) else {
        return Ok(None);
    };
    if let Some(end_date) = template.recurrence_end_date {
        if next > end_date {
            return Ok(None);
        }
    }
    if instance_exists(conn, template.id, next).await? {
        return Ok(None);
    }

    Ok(Some(insert_instance(conn, template, next).await?))
}
