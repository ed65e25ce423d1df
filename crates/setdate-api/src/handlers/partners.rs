//! Partner onboarding and venue handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use setdate_service::dto::{
    ClaimAccessRequest, ClaimAccessResponse, CreatePartnerRequest, OnboardingStatusResponse,
    PartnerResponse,
};
use setdate_service::{OnboardingService, PartnerService};

use crate::response::{ApiError, ApiResult, Created};
use crate::state::AppState;

/// Query parameters for the onboarding status endpoint
#[derive(Debug, Deserialize)]
pub struct OnboardingQuery {
    pub session_id: String,
}

/// Idempotent onboarding record lookup for a completed checkout session
///
/// The session is fetched from the payment processor so the customer
/// identity can never be forged by the caller. Replaying the same
/// session id returns the stored record with its original token.
///
/// GET /partners/onboarding?session_id=...
pub async fn get_onboarding(
    State(state): State<AppState>,
    Query(query): Query<OnboardingQuery>,
) -> ApiResult<Json<OnboardingStatusResponse>> {
    let session_id = query.session_id.trim();
    if session_id.is_empty() {
        return Err(ApiError::invalid_query("session_id is required"));
    }

    let session = state.stripe().fetch_checkout_session(session_id).await?;
    if !session.is_paid() {
        return Err(ApiError::invalid_query("Checkout session is not paid"));
    }

    let service = OnboardingService::new(state.service_context());
    let response = service.ensure_record(&session).await?;
    Ok(Json(response))
}

/// Exchange an onboarding token for a venue portal credential
///
/// POST /partners/claim-access
pub async fn claim_access(
    State(state): State<AppState>,
    Json(request): Json<ClaimAccessRequest>,
) -> ApiResult<Json<ClaimAccessResponse>> {
    let service = OnboardingService::new(state.service_context());
    let response = service.claim_access(&request.token).await?;
    Ok(Json(response))
}

/// Create a venue page from a one-time onboarding token
///
/// POST /partners
pub async fn create_partner(
    State(state): State<AppState>,
    Json(request): Json<CreatePartnerRequest>,
) -> ApiResult<Created<Json<PartnerResponse>>> {
    let service = PartnerService::new(state.service_context());
    let response = service.create_from_token(request).await?;
    Ok(Created(Json(response)))
}

/// Fetch a partner page by slug
///
/// GET /partners/{slug}
pub async fn get_partner(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<PartnerResponse>> {
    let service = PartnerService::new(state.service_context());
    let response = service.get_by_slug(&slug).await?;
    Ok(Json(response))
}
