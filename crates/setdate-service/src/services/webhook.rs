//! Webhook reconciler
//!
//! Consumes authenticated payment-processor events and applies the
//! matching entitlement mutation. Signature verification happens at the
//! API boundary; by the time an event reaches this service it is trusted.
//!
//! Safe under at-least-once delivery: every mutation is keyed by the
//! checkout session id with idempotent writes, so replays are no-ops.

use tracing::{info, instrument, warn};

use setdate_core::entities::{Payment, RentalsSubscriptionUpdate};
use setdate_core::value_objects::{normalise_email, organiser_id_from_email};

use crate::dto::webhook::{CheckoutSession, StripeEvent};
use crate::dto::{WebhookOutcome, WebhookResponse};

use super::context::ServiceContext;
use super::entitlement::EntitlementService;
use super::error::{ServiceError, ServiceResult};
use super::notification::NotificationService;

/// Webhook service
pub struct WebhookService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> WebhookService<'a> {
    /// Create a new WebhookService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Route an authenticated event to its handler
    #[instrument(skip(self, event), fields(event_id = %event.id, event_type = %event.event_type))]
    pub async fn handle_event(&self, event: StripeEvent) -> ServiceResult<WebhookResponse> {
        let outcome = match event.event_type.as_str() {
            "checkout.session.completed" => {
                let session: CheckoutSession = serde_json::from_value(event.data.object)
                    .map_err(|e| {
                        ServiceError::validation(format!("Malformed checkout session: {e}"))
                    })?;
                self.handle_checkout_completed(session).await?
            }
            other => {
                info!(event_type = other, "Ignoring unhandled event type");
                WebhookOutcome::Skipped
            }
        };

        Ok(WebhookResponse {
            received: true,
            outcome,
        })
    }

    /// Apply a completed checkout session exactly once
    #[instrument(skip(self, session), fields(session_id = %session.id))]
    pub async fn handle_checkout_completed(
        &self,
        session: CheckoutSession,
    ) -> ServiceResult<WebhookOutcome> {
        match session.product_type() {
            Some("rentals") => self.apply_rentals(&session).await,
            // Absent or any other tag is the organiser-upgrade product.
            _ => self.apply_organiser_upgrade(&session).await,
        }
    }

    /// Merge subscription fields into the rentals account named by the
    /// event. An unknown owner is logged and skipped, not an error - the
    /// processor will not redeliver anything more useful.
    async fn apply_rentals(&self, session: &CheckoutSession) -> ServiceResult<WebhookOutcome> {
        let account = match session.metadata.get("accountId") {
            Some(id) => self.ctx.rentals_repo().find_by_id(id).await?,
            None => match session.resolved_email() {
                Some(email) => {
                    self.ctx
                        .rentals_repo()
                        .find_by_email(&normalise_email(email))
                        .await?
                }
                None => None,
            },
        };

        let Some(account) = account else {
            warn!(session_id = %session.id, "Rentals session matched no account, skipping");
            return Ok(WebhookOutcome::Skipped);
        };

        let update = RentalsSubscriptionUpdate {
            plan_tier: session.metadata.get("planTier").cloned(),
            property_limit: session
                .metadata
                .get("propertyLimit")
                .and_then(|v| v.parse().ok()),
            email: session.resolved_email().map(normalise_email),
            stripe_customer_id: session.customer.clone(),
            stripe_subscription_id: session.subscription.clone(),
            subscription_status: Some("active".to_string()),
        };

        self.ctx
            .rentals_repo()
            .apply_subscription(&account.id, &update)
            .await?;

        info!(account_id = %account.id, "Rentals subscription updated");
        Ok(WebhookOutcome::RentalsUpdated)
    }

    /// Organiser upgrade path: flip the plan, record the payment keyed by
    /// session id, and send the confirmation once per session.
    async fn apply_organiser_upgrade(
        &self,
        session: &CheckoutSession,
    ) -> ServiceResult<WebhookOutcome> {
        if !session.is_paid() {
            warn!(session_id = %session.id, "Unpaid session, skipping upgrade");
            return Ok(WebhookOutcome::Skipped);
        }

        let Some(email) = session.resolved_email() else {
            warn!(session_id = %session.id, "Session has no customer email, skipping");
            return Ok(WebhookOutcome::Skipped);
        };
        let email = normalise_email(email);
        let organiser_id =
            organiser_id_from_email(&self.ctx.config().app.organiser_id_salt, &email);

        // Replay short-circuit on the organiser record itself: the dedup
        // marker commits with the upgrade, so a redelivery after a partial
        // failure re-applies the upgrade instead of skipping it.
        let organiser = self.ctx.organiser_repo().find(&organiser_id).await?;
        if organiser.is_some_and(|o| {
            o.unlocked() && o.last_stripe_session_id.as_deref() == Some(session.id.as_str())
        }) {
            info!(session_id = %session.id, "Session already applied, skipping");
            return Ok(WebhookOutcome::Duplicate);
        }

        // Audit record, written before the upgrade; the upsert is
        // merge-idempotent so replays rewrite it harmlessly.
        let payment = Payment::new(
            session.id.clone(),
            organiser_id,
            email.clone(),
            session.amount_total,
            session.currency.clone().unwrap_or_default(),
            session.metadata.get("priceId").cloned(),
        );
        self.ctx.payment_repo().upsert(&payment).await?;

        EntitlementService::new(self.ctx)
            .mark_upgraded(&email, session.customer.as_deref(), &session.id)
            .await?;

        // Upgrade is durable; the receipt is advisory.
        if let Err(e) = NotificationService::new(self.ctx)
            .upgrade_confirmation(&email)
            .await
        {
            warn!(session_id = %session.id, error = %e, "Upgrade confirmation email failed");
        }

        Ok(WebhookOutcome::OrganiserUpgraded)
    }
}
