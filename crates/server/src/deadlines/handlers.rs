//! Deadline CRUD and recurrence actions.
//!
//! Every read is scoped through the caller's accessible businesses;
//! deadlines with no business attribution are shared across both
//! practices and visible to all staff.

use auth::access::{accessible_businesses, require_business};
use axum::Json;
use chrono::Utc;
use entity::{deadlines, staff_accounts, Business};
use error::response::{ApiResponse, PaginationMeta};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::Set,
    ColumnTrait,
    Condition,
    EntityTrait,
    PaginatorTrait,
    QueryFilter,
    QueryOrder,
    TransactionTrait,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::engine;
use crate::{
    dto::{
        deadlines::{
            CreateDeadlineRequest,
            GenerateRequest,
            GenerateResponse,
            ListDeadlinesParams,
            SeriesUpdateRequest,
            UpdateDeadlineRequest,
        },
        SuccessResponse,
    },
    middleware::auth::AuthenticatedStaff,
    AppError,
    AppState,
    Result,
};

const DEFAULT_PER_PAGE: u64 = 50;

/// Business-scope gate for a single deadline. Unattributed deadlines are
/// visible to every staff member.
fn check_scope(actor: &staff_accounts::Model, business: Option<Business>) -> Result<()> {
    match business {
        Some(business) => require_business(actor, business),
        None => Ok(()),
    }
}

/// Loads a deadline the caller is allowed to see, or NOT_FOUND.
async fn load_scoped(
    state: &AppState,
    actor: &staff_accounts::Model,
    deadline_id: Uuid,
) -> Result<deadlines::Model> {
    let deadline = deadlines::Entity::find_by_id(deadline_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Deadline not found"))?;
    check_scope(actor, deadline.business)?;
    Ok(deadline)
}

/// Inner handler for creating a deadline.
///
/// A recurring template fans out its instances inside the same
/// transaction, so a template is never observable without its schedule.
pub async fn create_deadline_handler_inner(
    state: &AppState,
    actor: AuthenticatedStaff,
    req: CreateDeadlineRequest,
) -> Result<Json<deadlines::Model>> {
    req.validate()?;
    check_scope(&actor.0, req.business)?;

    if req.recurrence_pattern.is_none() && req.recurrence_end_date.is_some() {
        return Err(AppError::bad_request(
            "recurrence_end_date requires a recurrence pattern",
        ));
    }

    let now = Utc::now();
    let txn = state.db.begin().await?;

    let deadline = deadlines::ActiveModel {
        id:                  Set(Uuid::new_v4()),
        title:               Set(req.title),
        description:         Set(req.description),
        deadline_type:       Set(req.deadline_type),
        client_id:           Set(req.client_id),
        matter_id:           Set(req.matter_id),
        business:            Set(req.business),
        assigned_staff_id:   Set(req.assigned_staff_id),
        due_date:            Set(req.due_date),
        priority:            Set(req.priority),
        recurrence_pattern:  Set(req.recurrence_pattern),
        recurrence_end_date: Set(req.recurrence_end_date),
        parent_deadline_id:  Set(None),
        is_completed:        Set(false),
        completed_at:        Set(None),
        completed_by_id:     Set(None),
        created_by_id:       Set(actor.0.id),
        created_at:          Set(now),
        updated_at:          Set(now),
    }
    .insert(&txn)
    .await?;

    engine::create_reminders(&txn, deadline.id, deadline.due_date).await?;

    let generated = if deadline.recurrence_pattern.is_recurring() {
        engine::generate_recurring_instances(&txn, &deadline, engine::DEFAULT_MONTHS_AHEAD).await?
    }
    else {
        0
    };

    txn.commit().await?;

    info!(
        deadline_id = %deadline.id,
        created_by = %actor.0.id,
        instances = generated,
        "Deadline created"
    );

    Ok(Json(deadline))
}

/// Inner handler for listing deadlines within the caller's scope.
pub async fn list_deadlines_handler_inner(
    state: &AppState,
    actor: AuthenticatedStaff,
    params: ListDeadlinesParams,
) -> Result<Json<ApiResponse<Vec<deadlines::Model>>>> {
    let scope = accessible_businesses(&actor.0);

    let business_filter = match params.business {
        Some(business) => {
            require_business(&actor.0, business)?;
            Condition::all().add(deadlines::Column::Business.eq(business))
        },
        None => {
            Condition::any()
                .add(deadlines::Column::Business.is_null())
                .add(deadlines::Column::Business.is_in(scope))
        },
    };

    let mut query = deadlines::Entity::find().filter(business_filter);
    if !params.include_completed {
        query = query.filter(deadlines::Column::IsCompleted.eq(false));
    }

    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(DEFAULT_PER_PAGE);

    let paginator = query
        .order_by_asc(deadlines::Column::DueDate)
        .order_by_asc(deadlines::Column::CreatedAt)
        .paginate(&state.db, per_page.clamp(1, PaginationMeta::MAX_PER_PAGE));

    let total_items = paginator.num_items().await?;
    let items = paginator.fetch_page(page - 1).await?;
    let meta = PaginationMeta::new(page, per_page, total_items);

    Ok(Json(ApiResponse::paginated(items, meta)))
}

/// Inner handler for fetching a single deadline.
pub async fn get_deadline_handler_inner(
    state: &AppState,
    actor: AuthenticatedStaff,
    deadline_id: Uuid,
) -> Result<Json<deadlines::Model>> {
    let deadline = load_scoped(state, &actor.0, deadline_id).await?;
    Ok(Json(deadline))
}

/// Inner handler for updating a single deadline.
///
/// A due date change invalidates the reminder schedule, so the reminder
/// set is deleted and rebuilt in the same transaction.
pub async fn update_deadline_handler_inner(
    state: &AppState,
    actor: AuthenticatedStaff,
    deadline_id: Uuid,
    req: UpdateDeadlineRequest,
) -> Result<Json<deadlines::Model>> {
    req.validate()?;
    let deadline = load_scoped(state, &actor.0, deadline_id).await?;

    if let Some(new_business) = req.business {
        check_scope(&actor.0, Some(new_business))?;
    }

    let now = Utc::now();
    let due_date_changed = req
        .due_date
        .map(|d| d != deadline.due_date)
        .unwrap_or(false);

    let txn = state.db.begin().await?;

    let mut active: deadlines::ActiveModel = deadline.into();
    if let Some(title) = req.title {
        active.title = Set(title);
    }
    if let Some(description) = req.description {
        active.description = Set(Some(description));
    }
    if let Some(deadline_type) = req.deadline_type {
        active.deadline_type = Set(deadline_type);
    }
    if let Some(client_id) = req.client_id {
        active.client_id = Set(Some(client_id));
    }
    if let Some(matter_id) = req.matter_id {
        active.matter_id = Set(Some(matter_id));
    }
    if let Some(business) = req.business {
        active.business = Set(Some(business));
    }
    if let Some(assigned_staff_id) = req.assigned_staff_id {
        active.assigned_staff_id = Set(Some(assigned_staff_id));
    }
    if let Some(due_date) = req.due_date {
        active.due_date = Set(due_date);
    }
    if let Some(priority) = req.priority {
        active.priority = Set(priority);
    }
    active.updated_at = Set(now);
    let updated = active.update(&txn).await?;

    if due_date_changed {
        engine::regenerate_reminders(&txn, updated.id, updated.due_date).await?;
    }

    txn.commit().await?;

    info!(deadline_id = %updated.id, updated_by = %actor.0.id, "Deadline updated");

    Ok(Json(updated))
}

/// Inner handler for deleting a deadline.
///
/// Deleting a template cascades to its instances and all reminder rows
/// through the foreign keys.
pub async fn delete_deadline_handler_inner(
    state: &AppState,
    actor: AuthenticatedStaff,
    deadline_id: Uuid,
) -> Result<Json<SuccessResponse>> {
    let deadline = load_scoped(state, &actor.0, deadline_id).await?;

    deadlines::Entity::delete_by_id(deadline.id)
        .exec(&state.db)
        .await?;

    info!(deadline_id = %deadline.id, deleted_by = %actor.0.id, "Deadline deleted");

    Ok(Json(SuccessResponse::ok()))
}

/// Inner handler for marking a deadline complete.
///
/// Completing an instance whose template is still actively recurring
/// lazily materializes at most one successor instance in the same
/// transaction. Completing a template propagates nothing.
pub async fn complete_deadline_handler_inner(
    state: &AppState,
    actor: AuthenticatedStaff,
    deadline_id: Uuid,
) -> Result<Json<deadlines::Model>> {
    let deadline = load_scoped(state, &actor.0, deadline_id).await?;

    if deadline.is_completed {
        return Err(AppError::bad_request("Deadline is already completed"));
    }

    let now = Utc::now();
    let txn = state.db.begin().await?;

    let parent_id = deadline.parent_deadline_id;
    let due_date = deadline.due_date;

    let mut active: deadlines::ActiveModel = deadline.into();
    active.is_completed = Set(true);
    active.completed_at = Set(Some(now));
    active.completed_by_id = Set(Some(actor.0.id));
    active.updated_at = Set(now);
    let completed = active.update(&txn).await?;

    if let Some(parent_id) = parent_id {
        let template = deadlines::Entity::find_by_id(parent_id).one(&txn).await?;
        if let Some(template) = template {
            if template.recurrence_pattern.is_recurring() {
                engine::generate_next_instance(&txn, &template, due_date).await?;
            }
        }
    }

    txn.commit().await?;

    info!(deadline_id = %completed.id, completed_by = %actor.0.id, "Deadline completed");

    Ok(Json(completed))
}

/// Inner handler for reopening a completed deadline.
///
/// Clears the completion fields only; an instance generated when this one
/// was completed is never retracted.
pub async fn uncomplete_deadline_handler_inner(
    state: &AppState,
    actor: AuthenticatedStaff,
    deadline_id: Uuid,
) -> Result<Json<deadlines::Model>> {
    let deadline = load_scoped(state, &actor.0, deadline_id).await?;

    if !deadline.is_completed {
        return Err(AppError::bad_request("Deadline is not completed"));
    }

    let mut active: deadlines::ActiveModel = deadline.into();
    active.is_completed = Set(false);
    active.completed_at = Set(None);
    active.completed_by_id = Set(None);
    active.updated_at = Set(Utc::now());
    let reopened = active.update(&state.db).await?;

    info!(deadline_id = %reopened.id, reopened_by = %actor.0.id, "Deadline reopened");

    Ok(Json(reopened))
}

/// Inner handler for editing a recurring series.
///
/// The delta applies to the template and its incomplete instances;
/// completed instances are immutable history. The target may be the
/// template itself or any of its instances.
pub async fn update_series_handler_inner(
    state: &AppState,
    actor: AuthenticatedStaff,
    deadline_id: Uuid,
    req: SeriesUpdateRequest,
) -> Result<Json<SuccessResponse>> {
    req.validate()?;
    let target = load_scoped(state, &actor.0, deadline_id).await?;

    let template = match target.parent_deadline_id {
        None => target,
        Some(parent_id) => {
            deadlines::Entity::find_by_id(parent_id)
                .one(&state.db)
                .await?
                .ok_or_else(|| AppError::not_found("Deadline not found"))?
        },
    };

    if !template.recurrence_pattern.is_recurring() {
        return Err(AppError::bad_request("Deadline does not recur"));
    }

    let now = Utc::now();
    let txn = state.db.begin().await?;

    let mut update = deadlines::Entity::update_many()
        .col_expr(
            deadlines::Column::UpdatedAt,
            sea_orm::sea_query::Expr::value(now),
        )
        .filter(
            Condition::any()
                .add(deadlines::Column::Id.eq(template.id))
                .add(
                    Condition::all()
                        .add(deadlines::Column::ParentDeadlineId.eq(template.id))
                        .add(deadlines::Column::IsCompleted.eq(false)),
                ),
        );

    if let Some(ref title) = req.title {
        update = update.col_expr(
            deadlines::Column::Title,
            sea_orm::sea_query::Expr::value(title.clone()),
        );
    }
    if let Some(ref description) = req.description {
        update = update.col_expr(
            deadlines::Column::Description,
            sea_orm::sea_query::Expr::value(Some(description.clone())),
        );
    }
    if let Some(deadline_type) = req.deadline_type {
        update = update.col_expr(
            deadlines::Column::DeadlineType,
            sea_orm::sea_query::Expr::value(deadline_type),
        );
    }
    if let Some(priority) = req.priority {
        update = update.col_expr(
            deadlines::Column::Priority,
            sea_orm::sea_query::Expr::value(priority),
        );
    }
    if let Some(assigned_staff_id) = req.assigned_staff_id {
        update = update.col_expr(
            deadlines::Column::AssignedStaffId,
            sea_orm::sea_query::Expr::value(Some(assigned_staff_id)),
        );
    }

    update.exec(&txn).await?;

    // The end bound lives on the template row alone.
    if let Some(end_date) = req.recurrence_end_date {
        deadlines::Entity::update_many()
            .col_expr(
                deadlines::Column::RecurrenceEndDate,
                sea_orm::sea_query::Expr::value(Some(end_date)),
            )
            .filter(deadlines::Column::Id.eq(template.id))
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;

    info!(template_id = %template.id, updated_by = %actor.0.id, "Recurring series updated");

    Ok(Json(SuccessResponse::ok()))
}

/// Inner handler for explicit forward generation.
pub async fn generate_instances_handler_inner(
    state: &AppState,
    actor: AuthenticatedStaff,
    deadline_id: Uuid,
    req: GenerateRequest,
) -> Result<Json<GenerateResponse>> {
    req.validate()?;
    let deadline = load_scoped(state, &actor.0, deadline_id).await?;

    if !deadline.recurrence_pattern.is_recurring() {
        return Err(AppError::bad_request("Deadline does not recur"));
    }

    let months_ahead = req.months_ahead.unwrap_or(engine::DEFAULT_MONTHS_AHEAD);

    let txn = state.db.begin().await?;
    let generated = engine::generate_recurring_instances(&txn, &deadline, months_ahead).await?;
    txn.commit().await?;

    info!(
        template_id = %deadline.id,
        generated,
        requested_by = %actor.0.id,
        "Recurrence instances generated"
    );

    Ok(Json(GenerateResponse {
        success: true,
        generated,
    }))
}
