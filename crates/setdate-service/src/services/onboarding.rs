//! Onboarding service
//!
//! The token-issued → partner-created state machine per payment session,
//! plus the claim-access exchange that mints a venue portal credential.

use tracing::{info, instrument, warn};
use uuid::Uuid;

use setdate_core::entities::OnboardingRecord;
use setdate_core::error::DomainError;

use crate::dto::webhook::CheckoutSession;
use crate::dto::{ClaimAccessResponse, OnboardingStatusResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::notification::NotificationService;

/// Onboarding service
pub struct OnboardingService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> OnboardingService<'a> {
    /// Create a new OnboardingService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Idempotent record creation for a completed partner checkout
    ///
    /// Replaying the same session returns the stored record with its
    /// original token; the welcome email goes out only on first creation.
    #[instrument(skip(self, session), fields(session_id = %session.id))]
    pub async fn ensure_record(&self, session: &CheckoutSession) -> ServiceResult<OnboardingStatusResponse> {
        let email = session
            .resolved_email()
            .ok_or_else(|| ServiceError::validation("Checkout session has no customer email"))?;

        let candidate = OnboardingRecord::new(
            session.id.clone(),
            session.customer.clone(),
            email.to_string(),
            session.resolved_name().unwrap_or_default().to_string(),
        );
        let stored = self
            .ctx
            .onboarding_repo()
            .create_if_absent(&candidate)
            .await?;

        // A replay hands back a record with a different (original) token.
        let newly_created = stored.onboarding_token == candidate.onboarding_token;
        if newly_created {
            info!(session_id = %stored.session_id, "Onboarding record created");
            if let Err(e) = NotificationService::new(self.ctx).partner_welcome(&stored).await {
                warn!(session_id = %stored.session_id, error = %e, "Partner welcome email failed");
            }
        }

        Ok(OnboardingStatusResponse {
            session_id: stored.session_id,
            status: stored.status.as_str().to_string(),
            onboarding_token: stored.onboarding_token,
            partner_slug: stored.partner_slug,
        })
    }

    /// Resolve a claim token; absence is an invalid token, never a
    /// not-found, so token existence cannot be probed.
    #[instrument(skip(self, token))]
    pub async fn find_by_token(&self, token: &str) -> ServiceResult<OnboardingRecord> {
        self.ctx
            .onboarding_repo()
            .find_by_token(token)
            .await?
            .ok_or_else(|| DomainError::InvalidOnboardingToken.into())
    }

    /// Exchange an onboarding token for a short-lived venue portal
    /// credential
    ///
    /// Available at any onboarding status; a token match and the record's
    /// customer email are the only requirements, so owners can reach the
    /// portal before and after the venue page exists.
    #[instrument(skip(self, token))]
    pub async fn claim_access(&self, token: &str) -> ServiceResult<ClaimAccessResponse> {
        let record = self.find_by_token(token).await?;

        // Reuse a previously minted portal user so repeated claims don't
        // fork identities.
        let portal_user_id = match &record.portal_user_id {
            Some(id) => id.clone(),
            None => {
                let id = Uuid::new_v4().to_string();
                self.ctx
                    .onboarding_repo()
                    .set_portal_user(token, &id)
                    .await?;
                id
            }
        };

        let portal_token = self
            .ctx
            .portal_tokens()
            .mint(&portal_user_id, &record.customer_email, "venue")?;

        info!(session_id = %record.session_id, "Portal access granted");

        Ok(ClaimAccessResponse {
            portal_token,
            portal_user_id,
            partner_slug: record.partner_slug,
        })
    }
}
