//! Entitlement service
//!
//! Organiser plan lookups and the free→pro transition. Identity is the
//! salted hash of the normalised email; the raw email never becomes a
//! storage key.

use tracing::{info, instrument};
use validator::Validate;

use setdate_core::entities::Organiser;
use setdate_core::value_objects::{normalise_email, organiser_id_from_email};

use crate::dto::{OrganiserStatusRequest, OrganiserStatusResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Entitlement service
pub struct EntitlementService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> EntitlementService<'a> {
    /// Create a new EntitlementService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    fn identity(&self, email: &str) -> (String, String) {
        let email = normalise_email(email);
        let id = organiser_id_from_email(&self.ctx.config().app.organiser_id_salt, &email);
        (id, email)
    }

    /// Current plan status for an organiser; an absent record reads as a
    /// fresh free plan.
    #[instrument(skip(self, request))]
    pub async fn status(&self, request: OrganiserStatusRequest) -> ServiceResult<OrganiserStatusResponse> {
        request.validate()?;
        let (id, _) = self.identity(&request.email);
        let organiser = self.ctx.organiser_repo().find(&id).await?;
        let gating = self.ctx.config().gating;

        let (plan_type, count, unlocked) = match &organiser {
            Some(o) => (o.plan_type.as_str(), o.polls_created_count, o.unlocked()),
            None => ("free", 0, false),
        };

        Ok(OrganiserStatusResponse {
            plan_type: plan_type.to_string(),
            polls_created_count: count,
            unlocked,
            free_poll_limit: gating.free_poll_limit,
            free_date_limit: gating.free_date_limit,
        })
    }

    /// Idempotent create of a free-plan record
    #[instrument(skip(self))]
    pub async fn ensure(&self, email: &str) -> ServiceResult<Organiser> {
        let (id, email) = self.identity(email);
        let organiser = Organiser::new(id, email);
        Ok(self.ctx.organiser_repo().ensure(&organiser).await?)
    }

    /// Atomic counter bump, creating the record on first use
    #[instrument(skip(self))]
    pub async fn record_poll_created(&self, email: &str) -> ServiceResult<Organiser> {
        let (id, email) = self.identity(email);
        Ok(self
            .ctx
            .organiser_repo()
            .increment_polls_created(&id, &email)
            .await?)
    }

    /// Move the organiser to the pro plan; idempotent per session
    #[instrument(skip(self))]
    pub async fn mark_upgraded(
        &self,
        email: &str,
        stripe_customer_id: Option<&str>,
        session_id: &str,
    ) -> ServiceResult<Organiser> {
        let (id, email) = self.identity(email);
        let organiser = self
            .ctx
            .organiser_repo()
            .mark_upgraded(&id, &email, stripe_customer_id, session_id)
            .await?;
        info!(organiser_id = %organiser.id, "Organiser upgraded to pro");
        Ok(organiser)
    }
}
