//! Scheduler-triggered task handlers
//!
//! These endpoints are invoked by an external cron, not by users, and
//! are protected by a shared key header.

use axum::{extract::State, http::HeaderMap, Json};
use chrono::Utc;

use setdate_service::dto::SweepReport;
use setdate_service::ReminderService;

use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Header carrying the shared task key
const TASK_KEY_HEADER: &str = "x-tasks-key";

/// Run one reminder sweep over all active polls
///
/// POST /tasks/reminder-sweep
pub async fn reminder_sweep(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<SweepReport>> {
    let key = headers
        .get(TASK_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::MissingTaskKey)?;
    if key != state.config().tasks.key {
        return Err(ApiError::InvalidTaskKey);
    }

    let service = ReminderService::new(state.service_context());
    let report = service.run_sweep(Utc::now()).await?;
    Ok(Json(report))
}
