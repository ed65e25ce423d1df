//! Rentals account entity - the `productType = rentals` entitlement path

use chrono::{DateTime, Utc};

/// Rentals owner subscription record.
///
/// Shaped like the organiser entitlement but kept in its own collection;
/// webhook reconciliation merges fields rather than replacing the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentalsAccount {
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

/// Field-wise update applied to a rentals account from a completed
/// checkout session. `None` fields are left untouched (merge semantics).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RentalsSubscriptionUpdate {
    pub plan_tier: Option<String>,
    pub property_limit: Option<i32>,
    pub email: Option<String>,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub subscription_status: Option<String>,
}
