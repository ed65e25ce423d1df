//! Organiser entity <-> model mapper

use setdate_core::entities::{Organiser, PlanType};

use crate::models::OrganiserModel;

/// Convert OrganiserModel to Organiser entity
impl From<OrganiserModel> for Organiser {
    fn from(model: OrganiserModel) -> Self {
        // Only "free" and "pro" are ever written; anything else is treated
        // as the free plan rather than failing the read.
        let plan_type = if model.is_pro() {
            PlanType::Pro
        } else {
            PlanType::Free
        };

        Organiser {
            id: model.id,
            email: model.email,
            plan_type,
            polls_created_count: model.polls_created_count,
            stripe_customer_id: model.stripe_customer_id,
            last_stripe_session_id: model.last_stripe_session_id,
            last_upgrade_at: model.last_upgrade_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
