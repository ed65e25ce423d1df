//! Rentals account database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for rentals_accounts table
#[derive(Debug, Clone, FromRow)]
pub struct RentalsModel {
    pub id: String,
    pub email: String,
    pub plan_tier: Option<String>,
    pub property_limit: Option<i32>,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub subscription_status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
