//! Payment processor boundary
//!
//! Webhook signature verification and the checkout-session lookup used by
//! the onboarding success page. Both are HTTP-boundary concerns: by the
//! time an event or session reaches the service layer it is trusted.

use hmac::{Hmac, Mac};
use reqwest::StatusCode;
use sha2::Sha256;
use std::time::Duration;

use setdate_common::{AppError, StripeConfig};
use setdate_service::dto::CheckoutSession;

type HmacSha256 = Hmac<Sha256>;

/// Signature verification failures. All of them map to a 400 at the
/// HTTP layer; the distinction exists for logging.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("Malformed signature header")]
    MalformedHeader,

    #[error("Signature timestamp outside tolerance")]
    TimestampOutOfTolerance,

    #[error("Signature mismatch")]
    Mismatch,
}

/// Verify a `Stripe-Signature` header against the raw request body.
///
/// The header carries `t=<unix>,v1=<hex hmac>` pairs; the signed payload
/// is `{t}.{body}` with HMAC-SHA256 under the shared webhook secret. Any
/// one matching `v1` entry within the timestamp tolerance is accepted.
///
/// # Errors
/// Returns a `SignatureError` if the header is malformed, the timestamp
/// is outside `tolerance_secs` of `now`, or no signature matches.
pub fn verify_signature(
    secret: &str,
    payload: &[u8],
    header: &str,
    tolerance_secs: i64,
    now: i64,
) -> Result<(), SignatureError> {
    let mut timestamp: Option<i64> = None;
    let mut candidates: Vec<Vec<u8>> = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => {
                timestamp = value.parse().ok();
            }
            Some(("v1", value)) => {
                if let Some(sig) = decode_hex(value) {
                    candidates.push(sig);
                }
            }
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::MalformedHeader)?;
    if candidates.is_empty() {
        return Err(SignatureError::MalformedHeader);
    }
    if (now - timestamp).abs() > tolerance_secs {
        return Err(SignatureError::TimestampOutOfTolerance);
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| SignatureError::MalformedHeader)?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    // verify_slice is constant-time
    if candidates
        .iter()
        .any(|sig| mac.clone().verify_slice(sig).is_ok())
    {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

fn decode_hex(value: &str) -> Option<Vec<u8>> {
    if value.len() % 2 != 0 {
        return None;
    }
    (0..value.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(value.get(i..i + 2)?, 16).ok())
        .collect()
}

/// Thin client for the payment processor's REST API
pub struct StripeClient {
    http: reqwest::Client,
    api_base: String,
    secret_key: String,
}

impl StripeClient {
    /// Create a client from configuration
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &StripeConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::ExternalService(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
        })
    }

    /// Look up a checkout session by id
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown session id and `ExternalService`
    /// for transport failures or unexpected API responses.
    pub async fn fetch_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSession, AppError> {
        let url = format!("{}/checkout/sessions/{}", self.api_base, session_id);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Checkout session lookup: {e}")))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(AppError::NotFound("Checkout session".to_string())),
            status if status.is_success() => response
                .json::<CheckoutSession>()
                .await
                .map_err(|e| AppError::ExternalService(format!("Checkout session body: {e}"))),
            status => Err(AppError::ExternalService(format!(
                "Checkout session lookup returned {status}"
            ))),
        }
    }
}

impl std::fmt::Debug for StripeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeClient")
            .field("api_base", &self.api_base)
            .finish()
    }
}
