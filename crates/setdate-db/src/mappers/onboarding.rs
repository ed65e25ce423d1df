//! Onboarding session entity <-> model mapper

use setdate_core::entities::{OnboardingRecord, OnboardingStatus};

use crate::models::OnboardingModel;

/// Convert OnboardingModel to OnboardingRecord entity
impl From<OnboardingModel> for OnboardingRecord {
    fn from(model: OnboardingModel) -> Self {
        // Only the two known states are ever written; an unknown value is
        // read back as the unclaimed state rather than failing.
        let status = if model.is_claimed() {
            OnboardingStatus::PartnerCreated
        } else {
            OnboardingStatus::TokenIssued
        };

        OnboardingRecord {
            session_id: model.session_id,
            stripe_customer_id: model.stripe_customer_id,
            customer_email: model.customer_email,
            customer_name: model.customer_name,
            onboarding_token: model.onboarding_token,
            status,
            partner_id: model.partner_id,
            partner_slug: model.partner_slug,
            portal_user_id: model.portal_user_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
