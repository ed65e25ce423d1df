//! Payment database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for payments table, keyed by checkout session id
#[derive(Debug, Clone, FromRow)]
pub struct PaymentModel {
    pub session_id: String,
    pub organiser_id: String,
    pub email: String,
    pub amount_total: Option<i64>,
    pub currency: String,
    pub price_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
