//! # Integration Tests for the Deadline Engine
//!
//! Recurrence generation, reminder fan-out, completion semantics, and
//! business scoping against an in-memory database. Dates are derived from
//! today so the generation horizon behaves the same on any day.

mod common;

use chrono::{Days, Utc};
use common::{as_actor, create_staff, setup_state};
use entity::{
    deadline_reminders,
    deadlines::{self, DeadlineType, Priority, RecurrencePattern},
    Business,
    StaffRole,
};
use error::AppError;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use server::{
    deadlines::{
        engine,
        handlers::{
            complete_deadline_handler_inner,
            create_deadline_handler_inner,
            delete_deadline_handler_inner,
            generate_instances_handler_inner,
            get_deadline_handler_inner,
            list_deadlines_handler_inner,
            uncomplete_deadline_handler_inner,
            update_deadline_handler_inner,
            update_series_handler_inner,
        },
    },
    dto::deadlines::{
        CreateDeadlineRequest,
        GenerateRequest,
        ListDeadlinesParams,
        SeriesUpdateRequest,
        UpdateDeadlineRequest,
    },
    AppState,
};
use uuid::Uuid;

fn base_request(title: &str, days_ahead: u64) -> CreateDeadlineRequest {
    CreateDeadlineRequest {
        title:               title.to_string(),
        description:         None,
        deadline_type:       DeadlineType::Filing,
        client_id:           None,
        matter_id:           None,
        business:            None,
        assigned_staff_id:   None,
        due_date:            Utc::now().date_naive() + Days::new(days_ahead),
        priority:            Priority::Normal,
        recurrence_pattern:  RecurrencePattern::None,
        recurrence_end_date: None,
    }
}

async fn instances_of(state: &AppState, template_id: Uuid) -> Vec<deadlines::Model> {
    deadlines::Entity::find()
        .filter(deadlines::Column::ParentDeadlineId.eq(template_id))
        .order_by_asc(deadlines::Column::DueDate)
        .all(&state.db)
        .await
        .unwrap()
}

async fn reminders_of(state: &AppState, deadline_id: Uuid) -> Vec<deadline_reminders::Model> {
    deadline_reminders::Entity::find()
        .filter(deadline_reminders::Column::DeadlineId.eq(deadline_id))
        .order_by_asc(deadline_reminders::Column::ReminderDate)
        .all(&state.db)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_recurring_template_materializes_instances_on_create() {
    let state = setup_state().await;
    let staff = create_staff(&state, "staff@praxis.test", StaffRole::Owner, &[
        Business::Gcmc,
        Business::Kaj,
    ])
    .await;

    let due = Utc::now().date_naive() + Days::new(10);
    let mut req = base_request("VAT return", 10);
    req.recurrence_pattern = RecurrencePattern::Monthly;
    req.recurrence_end_date = due.checked_add_months(chrono::Months::new(3));

    let template = create_deadline_handler_inner(&state, as_actor(&staff), req)
        .await
        .expect("creation should succeed");

    let instances = instances_of(&state, template.0.id).await;
    assert_eq!(instances.len(), 3);
    for instance in &instances {
        assert_eq!(instance.recurrence_pattern, RecurrencePattern::None);
        assert_eq!(instance.parent_deadline_id, Some(template.0.id));
        assert!(!instance.is_completed);
    }
    assert_eq!(
        instances[0].due_date,
        due.checked_add_months(chrono::Months::new(1)).unwrap()
    );
}

#[tokio::test]
async fn test_generation_is_idempotent() {
    let state = setup_state().await;
    let staff = create_staff(&state, "staff@praxis.test", StaffRole::Owner, &[
        Business::Gcmc,
        Business::Kaj,
    ])
    .await;

    let due = Utc::now().date_naive() + Days::new(5);
    let mut req = base_request("Payroll submission", 5);
    req.recurrence_pattern = RecurrencePattern::Monthly;
    req.recurrence_end_date = due.checked_add_months(chrono::Months::new(4));

    let template = create_deadline_handler_inner(&state, as_actor(&staff), req)
        .await
        .expect("creation");
    let first_count = instances_of(&state, template.0.id).await.len();
    assert_eq!(first_count, 4);

    // Re-generating over the same window adds nothing.
    let regenerated =
        generate_instances_handler_inner(&state, as_actor(&staff), template.0.id, GenerateRequest {
            months_ahead: None,
        })
        .await
        .expect("regeneration");
    assert_eq!(regenerated.0.generated, 0);
    assert_eq!(instances_of(&state, template.0.id).await.len(), first_count);
}

#[tokio::test]
async fn test_generation_caps_at_two_hundred_instances() {
    let state = setup_state().await;
    let staff = create_staff(&state, "staff@praxis.test", StaffRole::Owner, &[
        Business::Gcmc,
        Business::Kaj,
    ])
    .await;

    let due = Utc::now().date_naive() + Days::new(1);
    let mut req = base_request("Daily cash count", 1);
    req.recurrence_pattern = RecurrencePattern::Daily;
    req.recurrence_end_date = Some(due + Days::new(400));

    let template = create_deadline_handler_inner(&state, as_actor(&staff), req)
        .await
        .expect("creation");

    assert_eq!(instances_of(&state, template.0.id).await.len(), 200);
}

#[tokio::test]
async fn test_generate_rejects_non_recurring_deadline() {
    let state = setup_state().await;
    let staff = create_staff(&state, "staff@praxis.test", StaffRole::Owner, &[
        Business::Gcmc,
        Business::Kaj,
    ])
    .await;

    let one_off = create_deadline_handler_inner(&state, as_actor(&staff), base_request("One-off", 30))
        .await
        .expect("creation");

    let err = generate_instances_handler_inner(&state, as_actor(&staff), one_off.0.id, GenerateRequest {
        months_ahead: None,
    })
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest { .. }));
}

#[tokio::test]
async fn test_reminders_skip_past_offsets() {
    let state = setup_state().await;
    let staff = create_staff(&state, "staff@praxis.test", StaffRole::Owner, &[
        Business::Gcmc,
        Business::Kaj,
    ])
    .await;

    // Five days out: only the 1-day and 0-day offsets are still future.
    let close = create_deadline_handler_inner(&state, as_actor(&staff), base_request("Close", 5))
        .await
        .expect("creation");
    let reminders = reminders_of(&state, close.0.id).await;
    assert_eq!(reminders.len(), 2);
    assert_eq!(reminders[0].days_before, 1);
    assert_eq!(reminders[1].days_before, 0);

    // Forty days out: the full offset set fits.
    let far = create_deadline_handler_inner(&state, as_actor(&staff), base_request("Far", 40))
        .await
        .expect("creation");
    assert_eq!(reminders_of(&state, far.0.id).await.len(), 5);
}

#[tokio::test]
async fn test_due_date_change_regenerates_reminders() {
    let state = setup_state().await;
    let staff = create_staff(&state, "staff@praxis.test", StaffRole::Owner, &[
        Business::Gcmc,
        Business::Kaj,
    ])
    .await;

    let deadline = create_deadline_handler_inner(&state, as_actor(&staff), base_request("Shifting", 40))
        .await
        .expect("creation");
    assert_eq!(reminders_of(&state, deadline.0.id).await.len(), 5);

    let new_due = Utc::now().date_naive() + Days::new(5);
    update_deadline_handler_inner(&state, as_actor(&staff), deadline.0.id, UpdateDeadlineRequest {
        title:             None,
        description:       None,
        deadline_type:     None,
        client_id:         None,
        matter_id:         None,
        business:          None,
        assigned_staff_id: None,
        due_date:          Some(new_due),
        priority:          None,
    })
    .await
    .expect("update");

    let reminders = reminders_of(&state, deadline.0.id).await;
    assert_eq!(reminders.len(), 2);
    for reminder in &reminders {
        assert!(reminder.reminder_date <= new_due);
    }
}

#[tokio::test]
async fn test_completing_last_instance_extends_the_series() {
    let state = setup_state().await;
    let staff = create_staff(&state, "staff@praxis.test", StaffRole::Owner, &[
        Business::Gcmc,
        Business::Kaj,
    ])
    .await;

    // Weekly with no explicit end: creation fills the 12-month horizon.
    let mut req = base_request("Weekly check-in", 1);
    req.recurrence_pattern = RecurrencePattern::Weekly;

    let template = create_deadline_handler_inner(&state, as_actor(&staff), req)
        .await
        .expect("creation");
    let instances = instances_of(&state, template.0.id).await;
    let count_before = instances.len();
    let last = instances.last().unwrap().clone();

    let completed = complete_deadline_handler_inner(&state, as_actor(&staff), last.id)
        .await
        .expect("completion");
    assert!(completed.0.is_completed);
    assert_eq!(completed.0.completed_by_id, Some(staff.id));

    // Exactly one successor appeared past the old horizon.
    let after = instances_of(&state, template.0.id).await;
    assert_eq!(after.len(), count_before + 1);
    assert_eq!(after.last().unwrap().due_date, last.due_date + Days::new(7));

    // Complete, reopen, complete again: still exactly one successor.
    uncomplete_deadline_handler_inner(&state, as_actor(&staff), last.id)
        .await
        .expect("reopen");
    complete_deadline_handler_inner(&state, as_actor(&staff), last.id)
        .await
        .expect("second completion");
    assert_eq!(instances_of(&state, template.0.id).await.len(), count_before + 1);
}

#[tokio::test]
async fn test_open_ended_series_outlives_the_pregeneration_bound() {
    let state = setup_state().await;
    let staff = create_staff(&state, "staff@praxis.test", StaffRole::Owner, &[
        Business::Gcmc,
        Business::Kaj,
    ])
    .await;

    let mut req = base_request("Retainer review", 1);
    req.recurrence_pattern = RecurrencePattern::Monthly;
    let template = create_deadline_handler_inner(&state, as_actor(&staff), req)
        .await
        .expect("creation");
    let model = deadlines::Entity::find_by_id(template.0.id)
        .one(&state.db)
        .await
        .unwrap()
        .unwrap();

    // Completion frontier far past the two-year pre-generation default:
    // with no explicit end date the series still produces a successor.
    let after = model
        .due_date
        .checked_add_months(chrono::Months::new(25))
        .unwrap();
    let next = engine::generate_next_instance(&state.db, &model, after)
        .await
        .expect("generation")
        .expect("open-ended series keeps producing successors");
    assert_eq!(
        next.due_date,
        after.checked_add_months(chrono::Months::new(1)).unwrap()
    );

    // An explicit end date still bounds the lazy step.
    let due = Utc::now().date_naive() + Days::new(1);
    let mut bounded_req = base_request("Bounded retainer review", 1);
    bounded_req.recurrence_pattern = RecurrencePattern::Monthly;
    bounded_req.recurrence_end_date = due.checked_add_months(chrono::Months::new(2));
    let bounded = create_deadline_handler_inner(&state, as_actor(&staff), bounded_req)
        .await
        .expect("creation");
    let bounded_model = deadlines::Entity::find_by_id(bounded.0.id)
        .one(&state.db)
        .await
        .unwrap()
        .unwrap();

    let end_date = bounded_model.recurrence_end_date.unwrap();
    let stopped = engine::generate_next_instance(&state.db, &bounded_model, end_date)
        .await
        .expect("generation");
    assert!(stopped.is_none());
}

#[tokio::test]
async fn test_uncomplete_clears_fields_without_retracting() {
    let state = setup_state().await;
    let staff = create_staff(&state, "staff@praxis.test", StaffRole::Owner, &[
        Business::Gcmc,
        Business::Kaj,
    ])
    .await;

    let mut req = base_request("Weekly report", 1);
    req.recurrence_pattern = RecurrencePattern::Weekly;
    let template = create_deadline_handler_inner(&state, as_actor(&staff), req)
        .await
        .expect("creation");
    let last = instances_of(&state, template.0.id).await.last().unwrap().clone();
    let count_before = instances_of(&state, template.0.id).await.len();

    complete_deadline_handler_inner(&state, as_actor(&staff), last.id)
        .await
        .expect("completion");
    assert_eq!(instances_of(&state, template.0.id).await.len(), count_before + 1);

    let reopened = uncomplete_deadline_handler_inner(&state, as_actor(&staff), last.id)
        .await
        .expect("reopen");
    assert!(!reopened.0.is_completed);
    assert_eq!(reopened.0.completed_at, None);
    assert_eq!(reopened.0.completed_by_id, None);

    // The successor generated at completion time stays.
    assert_eq!(instances_of(&state, template.0.id).await.len(), count_before + 1);
}

#[tokio::test]
async fn test_series_edit_spares_completed_history() {
    let state = setup_state().await;
    let staff = create_staff(&state, "staff@praxis.test", StaffRole::Owner, &[
        Business::Gcmc,
        Business::Kaj,
    ])
    .await;

    let due = Utc::now().date_naive() + Days::new(10);
    let mut req = base_request("Quarterly filing", 10);
    req.recurrence_pattern = RecurrencePattern::Monthly;
    req.recurrence_end_date = due.checked_add_months(chrono::Months::new(3));

    let template = create_deadline_handler_inner(&state, as_actor(&staff), req)
        .await
        .expect("creation");
    let instances = instances_of(&state, template.0.id).await;
    let done = instances[0].clone();

    complete_deadline_handler_inner(&state, as_actor(&staff), done.id)
        .await
        .expect("completion");

    // Target an instance: the edit resolves to the template's series.
    update_series_handler_inner(&state, as_actor(&staff), instances[1].id, SeriesUpdateRequest {
        title:               Some("Quarterly filing (revised)".to_string()),
        description:         None,
        deadline_type:       None,
        priority:            Some(Priority::High),
        assigned_staff_id:   None,
        recurrence_end_date: None,
    })
    .await
    .expect("series edit");

    let template_after = deadlines::Entity::find_by_id(template.0.id)
        .one(&state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(template_after.title, "Quarterly filing (revised)");
    assert_eq!(template_after.priority, Priority::High);

    for instance in instances_of(&state, template.0.id).await {
        if instance.id == done.id {
            // Completed history keeps the old shape.
            assert_eq!(instance.title, "Quarterly filing");
            assert_eq!(instance.priority, Priority::Normal);
        }
        else {
            assert_eq!(instance.title, "Quarterly filing (revised)");
            assert_eq!(instance.priority, Priority::High);
        }
    }
}

#[tokio::test]
async fn test_series_edit_moves_end_date_on_template_only() {
    let state = setup_state().await;
    let staff = create_staff(&state, "staff@praxis.test", StaffRole::Owner, &[
        Business::Gcmc,
        Business::Kaj,
    ])
    .await;

    let due = Utc::now().date_naive() + Days::new(10);
    let mut req = base_request("Monthly bookkeeping", 10);
    req.recurrence_pattern = RecurrencePattern::Monthly;
    req.recurrence_end_date = due.checked_add_months(chrono::Months::new(3));
    let template = create_deadline_handler_inner(&state, as_actor(&staff), req)
        .await
        .expect("creation");
    assert_eq!(instances_of(&state, template.0.id).await.len(), 3);

    let new_end = due.checked_add_months(chrono::Months::new(6));
    update_series_handler_inner(&state, as_actor(&staff), template.0.id, SeriesUpdateRequest {
        title:               None,
        description:         None,
        deadline_type:       None,
        priority:            None,
        assigned_staff_id:   None,
        recurrence_end_date: new_end,
    })
    .await
    .expect("series edit");

    let template_after = deadlines::Entity::find_by_id(template.0.id)
        .one(&state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(template_after.recurrence_end_date, new_end);
    for instance in instances_of(&state, template.0.id).await {
        assert_eq!(instance.recurrence_end_date, None);
    }

    // The widened bound is honored by the next generation pass.
    let more =
        generate_instances_handler_inner(&state, as_actor(&staff), template.0.id, GenerateRequest {
            months_ahead: None,
        })
        .await
        .expect("regeneration");
    assert_eq!(more.0.generated, 3);
    assert_eq!(instances_of(&state, template.0.id).await.len(), 6);
}

#[tokio::test]
async fn test_series_edit_rejects_non_recurring_target() {
    let state = setup_state().await;
    let staff = create_staff(&state, "staff@praxis.test", StaffRole::Owner, &[
        Business::Gcmc,
        Business::Kaj,
    ])
    .await;

    let one_off = create_deadline_handler_inner(&state, as_actor(&staff), base_request("One-off", 20))
        .await
        .expect("creation");

    let err = update_series_handler_inner(&state, as_actor(&staff), one_off.0.id, SeriesUpdateRequest {
        title:               Some("Renamed".to_string()),
        description:         None,
        deadline_type:       None,
        priority:            None,
        assigned_staff_id:   None,
        recurrence_end_date: None,
    })
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest { .. }));
}

#[tokio::test]
async fn test_business_scope_gates_deadline_access() {
    let state = setup_state().await;
    let owner = create_staff(&state, "owner@praxis.test", StaffRole::Owner, &[
        Business::Gcmc,
        Business::Kaj,
    ])
    .await;
    let gcmc_staff = create_staff(&state, "gcmc@praxis.test", StaffRole::StaffGcmc, &[
        Business::Gcmc,
    ])
    .await;

    let mut kaj_req = base_request("KAJ training session", 15);
    kaj_req.business = Some(Business::Kaj);
    kaj_req.deadline_type = DeadlineType::Meeting;
    let kaj_deadline = create_deadline_handler_inner(&state, as_actor(&owner), kaj_req)
        .await
        .expect("creation");

    let mut shared_req = base_request("Shared office task", 15);
    shared_req.deadline_type = DeadlineType::Other;
    create_deadline_handler_inner(&state, as_actor(&owner), shared_req)
        .await
        .expect("creation");

    // Out-of-scope single read is refused outright.
    let err = get_deadline_handler_inner(&state, as_actor(&gcmc_staff), kaj_deadline.0.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));

    // Explicitly asking for the other business is refused too.
    let err = list_deadlines_handler_inner(&state, as_actor(&gcmc_staff), ListDeadlinesParams {
        business: Some(Business::Kaj),
        ..Default::default()
    })
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));

    // The default listing shows own-business and unattributed deadlines only.
    let listed = list_deadlines_handler_inner(&state, as_actor(&gcmc_staff), ListDeadlinesParams::default())
        .await
        .expect("listing");
    let data = listed.0.data.unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0].title, "Shared office task");

    // GCMC staff cannot create a KAJ deadline either.
    let mut foreign = base_request("Sneaky", 15);
    foreign.business = Some(Business::Kaj);
    let err = create_deadline_handler_inner(&state, as_actor(&gcmc_staff), foreign)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));
}

#[tokio::test]
async fn test_listing_hides_completed_by_default() {
    let state = setup_state().await;
    let staff = create_staff(&state, "staff@praxis.test", StaffRole::Owner, &[
        Business::Gcmc,
        Business::Kaj,
    ])
    .await;

    let a = create_deadline_handler_inner(&state, as_actor(&staff), base_request("Done", 15))
        .await
        .expect("creation");
    create_deadline_handler_inner(&state, as_actor(&staff), base_request("Open", 20))
        .await
        .expect("creation");

    complete_deadline_handler_inner(&state, as_actor(&staff), a.0.id)
        .await
        .expect("completion");

    let default_list = list_deadlines_handler_inner(&state, as_actor(&staff), ListDeadlinesParams::default())
        .await
        .unwrap();
    assert_eq!(default_list.0.data.unwrap().len(), 1);

    let full_list = list_deadlines_handler_inner(&state, as_actor(&staff), ListDeadlinesParams {
        include_completed: true,
        ..Default::default()
    })
    .await
    .unwrap();
    assert_eq!(full_list.0.data.unwrap().len(), 2);
}

#[tokio::test]
async fn test_deleting_template_cascades_to_instances_and_reminders() {
    let state = setup_state().await;
    let staff = create_staff(&state, "staff@praxis.test", StaffRole::Owner, &[
        Business::Gcmc,
        Business::Kaj,
    ])
    .await;

    let due = Utc::now().date_naive() + Days::new(10);
    let mut req = base_request("Disposable series", 10);
    req.recurrence_pattern = RecurrencePattern::Monthly;
    req.recurrence_end_date = due.checked_add_months(chrono::Months::new(2));
    let template = create_deadline_handler_inner(&state, as_actor(&staff), req)
        .await
        .expect("creation");
    assert!(!instances_of(&state, template.0.id).await.is_empty());

    delete_deadline_handler_inner(&state, as_actor(&staff), template.0.id)
        .await
        .expect("deletion");

    assert_eq!(deadlines::Entity::find().count(&state.db).await.unwrap(), 0);
    assert_eq!(
        deadline_reminders::Entity::find().count(&state.db).await.unwrap(),
        0
    );
}
