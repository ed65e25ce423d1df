//! Organiser database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for organisers table
///
/// `plan_type` is stored as text; only the values written by
/// [`setdate_core::entities::PlanType::as_str`] ever reach the column.
#[derive(Debug, Clone, FromRow)]
pub struct OrganiserModel {
    pub id: String,
    pub email: String,
    pub plan_type: String,
    pub polls_created_count: i64,
    pub stripe_customer_id: Option<String>,
    pub last_stripe_session_id: Option<String>,
    pub last_upgrade_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrganiserModel {
    /// Check if the organiser is on the paid plan
    #[inline]
    pub fn is_pro(&self) -> bool {
        self.plan_type == "pro"
    }
}
