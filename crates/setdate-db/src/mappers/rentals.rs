//! Rentals account entity <-> model mapper

use setdate_core::entities::RentalsAccount;

use crate::models::RentalsModel;

/// Convert RentalsModel to RentalsAccount entity
impl From<RentalsModel> for RentalsAccount {
    fn from(model: RentalsModel) -> Self {
        RentalsAccount {
            id: model.id,
            email: model.email,
            plan_tier: model.plan_tier,
            property_limit: model.property_limit,
            stripe_customer_id: model.stripe_customer_id,
            stripe_subscription_id: model.stripe_subscription_id,
            subscription_status: model.subscription_status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
