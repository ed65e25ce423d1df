//! Payment record - one row per completed checkout session

use chrono::{DateTime, Utc};

/// Completed payment, keyed by the checkout session id.
///
/// The upgrade path uses the presence of this record to short-circuit
/// webhook replays for the same session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub session_id: String,
    pub organiser_id: String,
    pub email: String,
    pub amount_total: Option<i64>,
    pub currency: String,
    pub price_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(
        session_id: String,
        organiser_id: String,
        email: String,
        amount_total: Option<i64>,
        currency: String,
        price_id: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            organiser_id,
            email,
            amount_total,
            currency,
            price_id,
            created_at: now,
            updated_at: now,
        }
    }
}
