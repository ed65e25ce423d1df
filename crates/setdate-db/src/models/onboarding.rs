//! Onboarding session database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for onboarding_sessions table
///
/// `status` is stored as text; only the values written by
/// [`setdate_core::entities::OnboardingStatus::as_str`] ever reach the
/// column.
#[derive(Debug, Clone, FromRow)]
pub struct OnboardingModel {
    pub session_id: String,
    pub stripe_customer_id: Option<String>,
    pub customer_email: String,
    pub customer_name: String,
    pub onboarding_token: String,
    pub status: String,
    pub partner_id: Option<String>,
    pub partner_slug: Option<String>,
    pub portal_user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OnboardingModel {
    /// Check if the one-time claim has been consumed
    #[inline]
    pub fn is_claimed(&self) -> bool {
        self.status == "partner_created"
    }
}
