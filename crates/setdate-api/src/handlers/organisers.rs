//! Organiser entitlement handlers

use axum::{extract::State, Json};
use setdate_service::dto::{OrganiserStatusRequest, OrganiserStatusResponse};
use setdate_service::EntitlementService;

use crate::response::ApiResult;
use crate::state::AppState;

/// Current plan status for an organiser
///
/// POST /organisers/status
pub async fn get_status(
    State(state): State<AppState>,
    Json(request): Json<OrganiserStatusRequest>,
) -> ApiResult<Json<OrganiserStatusResponse>> {
    let service = EntitlementService::new(state.service_context());
    let response = service.status(request).await?;
    Ok(Json(response))
}

/// Atomically bump the organiser's poll-creation counter
///
/// POST /organisers/polls-created
pub async fn record_poll_created(
    State(state): State<AppState>,
    Json(request): Json<OrganiserStatusRequest>,
) -> ApiResult<Json<OrganiserStatusResponse>> {
    let service = EntitlementService::new(state.service_context());
    let email = request.email.clone();
    service.record_poll_created(&email).await?;
    let response = service.status(request).await?;
    Ok(Json(response))
}
