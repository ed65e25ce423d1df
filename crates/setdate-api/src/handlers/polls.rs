//! Poll handlers
//!
//! Endpoints for the poll lifecycle: creation, voting, and the
//! edit-token-guarded transitions.

use axum::{
    extract::{Path, State},
    Json,
};
use setdate_service::dto::{
    CancelPollRequest, CreatePollRequest, CreatePollResponse, ExtendDeadlineRequest,
    FinalizePollRequest, PollResponse, RecordVoteRequest, TallyResponse, VoteAccepted,
};
use setdate_service::PollService;

use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Create a poll
///
/// POST /polls
pub async fn create_poll(
    State(state): State<AppState>,
    Json(request): Json<CreatePollRequest>,
) -> ApiResult<Created<Json<CreatePollResponse>>> {
    let service = PollService::new(state.service_context());
    let response = service.create_poll(request).await?;
    Ok(Created(Json(response)))
}

/// Get a poll with its derived phase and current tally
///
/// GET /polls/{poll_id}
pub async fn get_poll(
    State(state): State<AppState>,
    Path(poll_id): Path<String>,
) -> ApiResult<Json<TallyResponse>> {
    let service = PollService::new(state.service_context());
    let response = service.get_poll(&poll_id).await?;
    Ok(Json(response))
}

/// Record (or replace) a vote
///
/// POST /polls/{poll_id}/votes
pub async fn record_vote(
    State(state): State<AppState>,
    Path(poll_id): Path<String>,
    Json(request): Json<RecordVoteRequest>,
) -> ApiResult<Json<VoteAccepted>> {
    let service = PollService::new(state.service_context());
    let response = service.record_vote(&poll_id, request).await?;
    Ok(Json(response))
}

/// Finalize the poll on one of its candidate dates
///
/// POST /polls/{poll_id}/finalize
pub async fn finalize_poll(
    State(state): State<AppState>,
    Path(poll_id): Path<String>,
    Json(request): Json<FinalizePollRequest>,
) -> ApiResult<Json<PollResponse>> {
    let service = PollService::new(state.service_context());
    let response = service.finalize(&poll_id, request).await?;
    Ok(Json(response))
}

/// Cancel the poll
///
/// POST /polls/{poll_id}/cancel
pub async fn cancel_poll(
    State(state): State<AppState>,
    Path(poll_id): Path<String>,
    Json(request): Json<CancelPollRequest>,
) -> ApiResult<Json<PollResponse>> {
    let service = PollService::new(state.service_context());
    let response = service.cancel(&poll_id, request).await?;
    Ok(Json(response))
}

/// Push the deadline out, re-arming the deadline reminders
///
/// POST /polls/{poll_id}/deadline
pub async fn extend_deadline(
    State(state): State<AppState>,
    Path(poll_id): Path<String>,
    Json(request): Json<ExtendDeadlineRequest>,
) -> ApiResult<Json<PollResponse>> {
    let service = PollService::new(state.service_context());
    let response = service.extend_deadline(&poll_id, request).await?;
    Ok(Json(response))
}

/// Get the current tally for a poll
///
/// GET /polls/{poll_id}/results
pub async fn get_results(
    State(state): State<AppState>,
    Path(poll_id): Path<String>,
) -> ApiResult<Json<TallyResponse>> {
    let service = PollService::new(state.service_context());
    let response = service.get_poll(&poll_id).await?;
    Ok(Json(response))
}
