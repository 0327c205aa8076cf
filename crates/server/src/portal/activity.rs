//! Best-effort portal activity logging.
//!
//! Activity rows are an audit aid, not a correctness dependency. A failed
//! insert is logged and swallowed so it can never fail the user action
//! that triggered it.

use chrono::Utc;
use entity::portal_activity_log;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DbConn};
use tracing::warn;
use uuid::Uuid;

/// Records a portal user action. Never returns an error.
pub async fn log_activity(
    db: &DbConn,
    portal_user_id: Uuid,
    action: &str,
    detail: Option<serde_json::Value>,
    ip_address: Option<String>,
) {
    let result = portal_activity_log::ActiveModel {
        id:             Set(Uuid::new_v4()),
        portal_user_id: Set(portal_user_id),
        action:         Set(action.to_string()),
        detail:         Set(detail),
        ip_address:     Set(ip_address),
        created_at:     Set(Utc::now()),
    }
    .insert(db)
    .await;

    if let Err(e) = result {
        warn!(
            portal_user_id = %portal_user_id,
            action,
            error = %e,
            "Failed to record portal activity"
        );
    }
}
