//! Payment processor webhook handler
//!
//! Signature verification happens here, over the raw request body,
//! before anything is parsed or handed to the reconciler.

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use tracing::warn;

use setdate_service::dto::{StripeEvent, WebhookResponse};
use setdate_service::WebhookService;

use crate::response::{ApiError, ApiResult};
use crate::state::AppState;
use crate::stripe::verify_signature;

/// Header carrying the webhook signature
const SIGNATURE_HEADER: &str = "stripe-signature";

/// Receive a payment processor event
///
/// POST /webhooks/stripe
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<WebhookResponse>> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::invalid_query("Missing signature header"))?;

    let stripe = &state.config().stripe;
    verify_signature(
        &stripe.webhook_secret,
        &body,
        signature,
        stripe.signature_tolerance_secs,
        Utc::now().timestamp(),
    )
    .map_err(|e| {
        warn!(error = %e, "Webhook signature verification failed");
        ApiError::InvalidSignature(e)
    })?;

    let event: StripeEvent = serde_json::from_slice(&body)
        .map_err(|e| ApiError::invalid_query(format!("Malformed event payload: {e}")))?;

    let service = WebhookService::new(state.service_context());
    let response = service.handle_event(event).await?;
    Ok(Json(response))
}
