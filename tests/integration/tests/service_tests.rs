//! Service-level behaviour tests against in-memory fixtures
//!
//! Run with: cargo test -p integration-tests --test service_tests

use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, NaiveDate, Utc};

use integration_tests::TestHarness;
use setdate_core::entities::{OnboardingRecord, PlanType, Poll, RentalsAccount, VoteResponse};
use setdate_core::error::DomainError;
use setdate_core::traits::PartnerRepository;
use setdate_core::value_objects::{normalise_email, organiser_id_from_email};
use setdate_service::dto::{
    CancelPollRequest, CheckoutSession, CreatePollRequest, CreatePartnerRequest,
    ExtendDeadlineRequest, FinalizePollRequest, OrganiserStatusRequest, RecordVoteRequest,
    StripeEvent, StripeEventData, WebhookOutcome,
};
use setdate_service::{
    EntitlementService, OnboardingService, PartnerService, PollService, ReminderService,
    ServiceError, WebhookService,
};

fn date(s: &str) -> NaiveDate {
    s.parse().expect("valid date")
}

fn create_poll_request(deadline_hours: Option<i64>) -> CreatePollRequest {
    CreatePollRequest {
        organiser_email: "organiser@example.com".to_string(),
        organiser_name: "Alex".to_string(),
        event_title: "Team dinner".to_string(),
        location: "London".to_string(),
        candidate_dates: vec![date("2026-10-01"), date("2026-10-02"), date("2026-10-03")],
        deadline: deadline_hours.map(|h| Utc::now() + Duration::hours(h)),
    }
}

fn vote_request(email: &str, response: VoteResponse) -> RecordVoteRequest {
    let mut responses = BTreeMap::new();
    responses.insert(date("2026-10-01"), response);
    responses.insert(date("2026-10-02"), VoteResponse::No);
    RecordVoteRequest {
        voter_email: email.to_string(),
        voter_name: "Sam".to_string(),
        responses,
        message: None,
    }
}

fn checkout_session(id: &str, email: &str, metadata: &[(&str, &str)]) -> CheckoutSession {
    CheckoutSession {
        id: id.to_string(),
        customer: Some("cus_1".to_string()),
        customer_details: None,
        customer_email: Some(email.to_string()),
        metadata: metadata
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect::<HashMap<_, _>>(),
        payment_status: Some("paid".to_string()),
        status: Some("complete".to_string()),
        amount_total: Some(4900),
        currency: Some("gbp".to_string()),
        subscription: None,
    }
}

fn partner_request(token: &str) -> CreatePartnerRequest {
    CreatePartnerRequest {
        token: token.to_string(),
        venue_name: "The Golden Fork".to_string(),
        contact_name: "Robin".to_string(),
        brand_color: None,
        city: "Bristol".to_string(),
        full_address: "1 Harbour Way".to_string(),
        venue_pitch: "Seasonal menus by the water".to_string(),
        logo_url: String::new(),
        booking_url: None,
        meal_tags: vec!["Vegan".to_string(), "vegan".to_string()],
        gallery_photos: vec![],
    }
}

// ============================================================================
// Poll lifecycle
// ============================================================================

#[tokio::test]
async fn vote_resubmission_replaces_rather_than_duplicates() {
    let h = TestHarness::new();
    let service = PollService::new(&h.ctx);

    let created = service.create_poll(create_poll_request(None)).await.unwrap();
    let poll_id = created.poll.id.clone();

    let first = service
        .record_vote(&poll_id, vote_request("sam@example.com", VoteResponse::Yes))
        .await
        .unwrap();
    assert_eq!(first.tally.total_votes, 1);

    // Same voter, changed answers: full replace, still one vote.
    let second = service
        .record_vote(&poll_id, vote_request("Sam@Example.com", VoteResponse::Maybe))
        .await
        .unwrap();
    assert_eq!(second.tally.total_votes, 1);

    let stored = h.votes.get(&poll_id, "sam@example.com").expect("vote stored");
    assert_eq!(stored.responses[&date("2026-10-01")], VoteResponse::Maybe);
}

#[tokio::test]
async fn vote_on_unknown_date_is_rejected() {
    let h = TestHarness::new();
    let service = PollService::new(&h.ctx);

    let created = service.create_poll(create_poll_request(None)).await.unwrap();

    let mut responses = BTreeMap::new();
    responses.insert(date("2030-01-01"), VoteResponse::Yes);
    let request = RecordVoteRequest {
        voter_email: "sam@example.com".to_string(),
        voter_name: "Sam".to_string(),
        responses,
        message: None,
    };

    let err = service.record_vote(&created.poll.id, request).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::DateNotCandidate(_))
    ));
}

#[tokio::test]
async fn finalize_after_cancel_is_a_conflict() {
    let h = TestHarness::new();
    let service = PollService::new(&h.ctx);

    let created = service.create_poll(create_poll_request(Some(48))).await.unwrap();
    let poll_id = created.poll.id.clone();
    let token = created.edit_token.clone();

    service
        .cancel(&poll_id, CancelPollRequest { edit_token: token.clone() })
        .await
        .unwrap();

    let err = service
        .finalize(
            &poll_id,
            FinalizePollRequest {
                edit_token: token,
                final_date: date("2026-10-01"),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::PollAlreadyCancelled)
    ));

    // Exactly one terminal state persisted.
    let poll = h.polls.get(&poll_id).unwrap();
    assert!(poll.cancelled_at.is_some());
    assert!(poll.final_date.is_none());
}

#[tokio::test]
async fn mutation_requires_the_edit_token() {
    let h = TestHarness::new();
    let service = PollService::new(&h.ctx);

    let created = service.create_poll(create_poll_request(Some(48))).await.unwrap();

    let err = service
        .cancel(
            &created.poll.id,
            CancelPollRequest {
                edit_token: "wrong-token".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::EditTokenMismatch)
    ));
}

#[tokio::test]
async fn poll_phase_follows_the_deadline() {
    let h = TestHarness::new();
    let service = PollService::new(&h.ctx);

    // Deadline two hours out, inside the 24h lookahead.
    let near = service.create_poll(create_poll_request(Some(2))).await.unwrap();
    assert_eq!(near.poll.phase, "closing_soon");

    let mut far = create_poll_request(Some(72));
    far.organiser_email = "other@example.com".to_string();
    let far = service.create_poll(far).await.unwrap();
    assert_eq!(far.poll.phase, "open");

    // A deadline in the past reads as closed.
    let expired = seeded_poll(Some(-1), 2);
    let expired_id = expired.id.clone();
    h.polls.put(expired);
    let view = service.get_poll(&expired_id).await.unwrap();
    assert_eq!(view.poll.phase, "closed");
}

// ============================================================================
// Free-plan gating
// ============================================================================

#[tokio::test]
async fn free_plan_poll_limit_is_enforced_and_lifted_by_upgrade() {
    let h = TestHarness::new();
    let service = PollService::new(&h.ctx);

    service.create_poll(create_poll_request(None)).await.unwrap();

    // Default free limit is one poll.
    let err = service.create_poll(create_poll_request(None)).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::PollLimitReached)
    ));

    EntitlementService::new(&h.ctx)
        .mark_upgraded("organiser@example.com", Some("cus_9"), "cs_upgrade")
        .await
        .unwrap();

    service.create_poll(create_poll_request(None)).await.unwrap();
}

#[tokio::test]
async fn ensure_entitlement_creates_one_free_record() {
    let h = TestHarness::new();
    let service = EntitlementService::new(&h.ctx);

    let first = service.ensure(" New@Example.com ").await.unwrap();
    assert_eq!(first.plan_type, PlanType::Free);
    assert_eq!(first.polls_created_count, 0);

    // Concurrent-create collapse: the same normalised email maps to one
    // record, and a replay leaves it untouched.
    let second = service.ensure("new@example.com").await.unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.polls_created_count, 0);
}

#[tokio::test]
async fn organiser_status_counts_every_increment() {
    let h = TestHarness::new();
    let service = EntitlementService::new(&h.ctx);

    let fresh = service
        .status(OrganiserStatusRequest {
            email: "new@example.com".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(fresh.plan_type, "free");
    assert_eq!(fresh.polls_created_count, 0);
    assert!(!fresh.unlocked);

    for _ in 0..3 {
        service.record_poll_created("new@example.com").await.unwrap();
    }

    let status = service
        .status(OrganiserStatusRequest {
            email: "new@example.com".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(status.polls_created_count, 3);

    let upgraded = service
        .mark_upgraded("new@example.com", None, "cs_1")
        .await
        .unwrap();
    assert!(upgraded.unlocked());

    let status = service
        .status(OrganiserStatusRequest {
            email: "new@example.com".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(status.plan_type, "pro");
    assert!(status.unlocked);
}

// ============================================================================
// Reminder sweep
// ============================================================================

/// A poll inserted directly so timing fields can be controlled.
fn seeded_poll(deadline_hours: Option<i64>, age_hours: i64) -> Poll {
    let now = Utc::now();
    let mut poll = Poll::new(
        "organiser@example.com".to_string(),
        "Alex".to_string(),
        "Team dinner".to_string(),
        "London".to_string(),
        vec![date("2026-10-01"), date("2026-10-02")],
        deadline_hours.map(|h| now + Duration::hours(h)),
    );
    poll.created_at = now - Duration::hours(age_hours);
    poll
}

#[tokio::test]
async fn double_sweep_sends_the_closing_soon_notice_once() {
    let h = TestHarness::new();
    h.polls.put(seeded_poll(Some(2), 1));
    let service = ReminderService::new(&h.ctx);
    let now = Utc::now();

    let first = service.run_sweep(now).await.unwrap();
    assert_eq!(first.scanned, 1);
    assert_eq!(first.closing_soon_sent, 1);
    assert_eq!(first.errors, 0);
    assert_eq!(h.mailer.sent_count(), 1);

    let second = service.run_sweep(now).await.unwrap();
    assert_eq!(second.closing_soon_sent, 0);
    assert_eq!(h.mailer.sent_count(), 1);
}

#[tokio::test]
async fn post_deadline_notice_fires_once_and_sets_the_flag() {
    let h = TestHarness::new();
    let poll = seeded_poll(Some(-1), 2);
    let poll_id = poll.id.clone();
    h.polls.put(poll);
    let service = ReminderService::new(&h.ctx);
    let now = Utc::now();

    let report = service.run_sweep(now).await.unwrap();
    assert_eq!(report.post_deadline_sent, 1);
    assert_eq!(h.mailer.sent_count(), 1);
    assert!(h.polls.get(&poll_id).unwrap().post_deadline_sent);

    let again = service.run_sweep(now).await.unwrap();
    assert_eq!(again.post_deadline_sent, 0);
    assert_eq!(h.mailer.sent_count(), 1);
}

#[tokio::test]
async fn failed_send_leaves_the_flag_unset_for_retry() {
    let h = TestHarness::new();
    let poll = seeded_poll(Some(-1), 2);
    let poll_id = poll.id.clone();
    h.polls.put(poll);
    let service = ReminderService::new(&h.ctx);
    let now = Utc::now();

    h.mailer.set_failing(true);
    let report = service.run_sweep(now).await.unwrap();
    assert_eq!(report.post_deadline_sent, 0);
    assert_eq!(report.errors, 1);
    assert!(!h.polls.get(&poll_id).unwrap().post_deadline_sent);

    // Next sweep succeeds and flips the flag.
    h.mailer.set_failing(false);
    let retry = service.run_sweep(now).await.unwrap();
    assert_eq!(retry.post_deadline_sent, 1);
    assert!(h.polls.get(&poll_id).unwrap().post_deadline_sent);
}

#[tokio::test]
async fn extension_resets_flags_and_suppresses_a_stale_resend() {
    let h = TestHarness::new();
    let poll_service = PollService::new(&h.ctx);
    let reminder_service = ReminderService::new(&h.ctx);
    let now = Utc::now();

    let created = poll_service.create_poll(create_poll_request(Some(2))).await.unwrap();
    let poll_id = created.poll.id.clone();

    reminder_service.run_sweep(now).await.unwrap();
    assert!(h.polls.get(&poll_id).unwrap().closing_soon_sent);
    let sent_before = h.mailer.sent_count();

    poll_service
        .extend_deadline(
            &poll_id,
            ExtendDeadlineRequest {
                edit_token: created.edit_token.clone(),
                new_deadline: now + Duration::hours(100),
            },
        )
        .await
        .unwrap();

    let poll = h.polls.get(&poll_id).unwrap();
    assert!(!poll.closing_soon_sent);
    assert!(!poll.post_deadline_sent);

    // The new deadline is outside the lookahead: re-armed but silent.
    let report = reminder_service.run_sweep(now).await.unwrap();
    assert_eq!(report.closing_soon_sent, 0);
    assert_eq!(report.post_deadline_sent, 0);
    assert_eq!(h.mailer.sent_count(), sent_before);
}

#[tokio::test]
async fn low_votes_nudges_are_bounded_and_spaced() {
    let h = TestHarness::new();
    let poll = seeded_poll(None, 30);
    let poll_id = poll.id.clone();
    h.polls.put(poll);
    let service = ReminderService::new(&h.ctx);
    let now = Utc::now();

    let first = service.run_sweep(now).await.unwrap();
    assert_eq!(first.low_votes_sent, 1);

    // Within the 48h spacing window: no second nudge.
    let second = service.run_sweep(now + Duration::hours(1)).await.unwrap();
    assert_eq!(second.low_votes_sent, 0);

    // Spaced out but now past the 120h age cap: still silent.
    let third = service.run_sweep(now + Duration::hours(100)).await.unwrap();
    assert_eq!(third.low_votes_sent, 0);

    assert_eq!(h.polls.get(&poll_id).unwrap().low_votes_reminder_count, 1);
}

#[tokio::test]
async fn low_votes_nudge_suppressed_once_someone_votes() {
    let h = TestHarness::new();
    let poll = seeded_poll(None, 30);
    let poll_id = poll.id.clone();
    h.polls.put(poll);

    PollService::new(&h.ctx)
        .record_vote(&poll_id, vote_request("sam@example.com", VoteResponse::Yes))
        .await
        .unwrap();
    let sent_before = h.mailer.sent_count();

    let report = ReminderService::new(&h.ctx).run_sweep(Utc::now()).await.unwrap();
    assert_eq!(report.low_votes_sent, 0);
    assert_eq!(h.mailer.sent_count(), sent_before);
}

// ============================================================================
// Onboarding and partner creation
// ============================================================================

#[tokio::test]
async fn onboarding_ensure_is_idempotent_per_session() {
    let h = TestHarness::new();
    let service = OnboardingService::new(&h.ctx);
    let session = checkout_session("cs_partner_1", "venue@example.com", &[]);

    let first = service.ensure_record(&session).await.unwrap();
    assert_eq!(first.status, "token_issued");
    assert_eq!(h.mailer.sent_count(), 1);

    // Replay: same record, same token, no second welcome email.
    let replay = service.ensure_record(&session).await.unwrap();
    assert_eq!(replay.onboarding_token, first.onboarding_token);
    assert_eq!(h.mailer.sent_count(), 1);
}

#[tokio::test]
async fn double_claim_creates_exactly_one_partner() {
    let h = TestHarness::new();
    let record = OnboardingRecord::new(
        "cs_partner_1".to_string(),
        Some("cus_1".to_string()),
        "venue@example.com".to_string(),
        "Robin".to_string(),
    );
    let token = record.onboarding_token.clone();
    h.onboarding.put(record);

    let service = PartnerService::new(&h.ctx);
    let created = service.create_from_token(partner_request(&token)).await.unwrap();
    assert_eq!(created.slug, "the-golden-fork");
    // Contact identity comes from the paid session, not the request body.
    assert_eq!(created.meal_tags, vec!["vegan"]);

    let err = service.create_from_token(partner_request(&token)).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::OnboardingAlreadyClaimed)
    ));
    assert_eq!(h.partners.count(), 1);

    let stored = h.onboarding.get("cs_partner_1").unwrap();
    assert_eq!(stored.partner_slug.as_deref(), Some("the-golden-fork"));
}

#[tokio::test]
async fn slug_collisions_get_numeric_suffixes() {
    let h = TestHarness::new();

    for session in ["cs_a", "cs_b"] {
        let record = OnboardingRecord::new(
            session.to_string(),
            None,
            format!("{session}@example.com"),
            "Robin".to_string(),
        );
        let token = record.onboarding_token.clone();
        h.onboarding.put(record);
        PartnerService::new(&h.ctx)
            .create_from_token(partner_request(&token))
            .await
            .unwrap();
    }

    assert!(h.partners.find_by_slug("the-golden-fork").await.unwrap().is_some());
    assert!(h.partners.find_by_slug("the-golden-fork-2").await.unwrap().is_some());
}

#[tokio::test]
async fn claim_access_works_at_any_onboarding_status() {
    let h = TestHarness::new();
    let record = OnboardingRecord::new(
        "cs_partner_1".to_string(),
        None,
        "venue@example.com".to_string(),
        "Robin".to_string(),
    );
    let token = record.onboarding_token.clone();
    h.onboarding.put(record);

    // Portal access is available before the venue page exists.
    let service = OnboardingService::new(&h.ctx);
    let access = service.claim_access(&token).await.unwrap();
    assert!(!access.portal_token.is_empty());
    assert!(access.partner_slug.is_none());

    PartnerService::new(&h.ctx)
        .create_from_token(partner_request(&token))
        .await
        .unwrap();

    // After creation the claim carries the slug and reuses the portal
    // identity minted earlier.
    let again = service.claim_access(&token).await.unwrap();
    assert_eq!(again.portal_user_id, access.portal_user_id);
    assert_eq!(again.partner_slug.as_deref(), Some("the-golden-fork"));
}

#[tokio::test]
async fn claim_access_with_unknown_token_is_unauthorized_not_absent() {
    let h = TestHarness::new();
    let err = OnboardingService::new(&h.ctx)
        .claim_access("no-such-token")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::InvalidOnboardingToken)
    ));
}

// ============================================================================
// Webhook reconciliation
// ============================================================================

fn completed_event(session: &CheckoutSession) -> StripeEvent {
    StripeEvent {
        id: "evt_1".to_string(),
        event_type: "checkout.session.completed".to_string(),
        data: StripeEventData {
            object: serde_json::json!({
                "id": session.id,
                "customer": session.customer,
                "customer_email": session.customer_email,
                "metadata": session.metadata,
                "payment_status": session.payment_status,
                "status": session.status,
                "amount_total": session.amount_total,
                "currency": session.currency,
                "subscription": session.subscription,
            }),
        },
    }
}

#[tokio::test]
async fn completed_checkout_upgrades_the_organiser_once() {
    let h = TestHarness::new();
    let service = WebhookService::new(&h.ctx);
    let session = checkout_session("cs_up_1", "organiser@example.com", &[]);

    let first = service.handle_event(completed_event(&session)).await.unwrap();
    assert_eq!(first.outcome, WebhookOutcome::OrganiserUpgraded);

    let id = organiser_id_from_email("test-salt", &normalise_email("organiser@example.com"));
    let organiser = h.organisers.get(&id).expect("organiser stored");
    assert!(organiser.unlocked());
    assert_eq!(organiser.last_stripe_session_id.as_deref(), Some("cs_up_1"));
    assert_eq!(h.payments.count(), 1);

    // Redelivery short-circuits on the applied upgrade.
    let replay = service.handle_event(completed_event(&session)).await.unwrap();
    assert_eq!(replay.outcome, WebhookOutcome::Duplicate);
    assert_eq!(h.payments.count(), 1);
}

#[tokio::test]
async fn replay_after_failed_upgrade_reapplies_it() {
    let h = TestHarness::new();
    let service = WebhookService::new(&h.ctx);
    let session = checkout_session("cs_up_2", "organiser@example.com", &[]);

    // First delivery dies after the payment row is written.
    h.organisers.fail_next_upgrade();
    let err = service.handle_event(completed_event(&session)).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::DatabaseUnavailable(_))
    ));
    assert_eq!(h.payments.count(), 1);

    // Redelivery applies the upgrade; only an applied session reads as a
    // duplicate.
    let replay = service.handle_event(completed_event(&session)).await.unwrap();
    assert_eq!(replay.outcome, WebhookOutcome::OrganiserUpgraded);

    let id = organiser_id_from_email("test-salt", &normalise_email("organiser@example.com"));
    let organiser = h.organisers.get(&id).expect("organiser stored");
    assert!(organiser.unlocked());
    assert_eq!(h.payments.count(), 1);

    let again = service.handle_event(completed_event(&session)).await.unwrap();
    assert_eq!(again.outcome, WebhookOutcome::Duplicate);
}

#[tokio::test]
async fn unpaid_session_is_skipped() {
    let h = TestHarness::new();
    let mut session = checkout_session("cs_up_1", "organiser@example.com", &[]);
    session.payment_status = Some("unpaid".to_string());
    session.status = Some("open".to_string());

    let response = WebhookService::new(&h.ctx)
        .handle_event(completed_event(&session))
        .await
        .unwrap();
    assert_eq!(response.outcome, WebhookOutcome::Skipped);
    assert_eq!(h.payments.count(), 0);
}

#[tokio::test]
async fn unhandled_event_types_are_acknowledged_and_skipped() {
    let h = TestHarness::new();
    let event = StripeEvent {
        id: "evt_2".to_string(),
        event_type: "invoice.paid".to_string(),
        data: StripeEventData {
            object: serde_json::json!({}),
        },
    };

    let response = WebhookService::new(&h.ctx).handle_event(event).await.unwrap();
    assert!(response.received);
    assert_eq!(response.outcome, WebhookOutcome::Skipped);
}

#[tokio::test]
async fn rentals_sessions_merge_into_the_owning_account() {
    let h = TestHarness::new();
    let now = Utc::now();
    h.rentals.put(RentalsAccount {
        id: "acct-1".to_string(),
        email: "owner@example.com".to_string(),
        plan_tier: None,
        property_limit: Some(1),
        stripe_customer_id: None,
        stripe_subscription_id: None,
        subscription_status: None,
        created_at: now,
        updated_at: now,
    });

    let session = checkout_session(
        "cs_rent_1",
        "owner@example.com",
        &[
            ("productType", "rentals"),
            ("accountId", "acct-1"),
            ("planTier", "growth"),
            ("propertyLimit", "10"),
        ],
    );
    let response = WebhookService::new(&h.ctx)
        .handle_event(completed_event(&session))
        .await
        .unwrap();
    assert_eq!(response.outcome, WebhookOutcome::RentalsUpdated);

    let account = h.rentals.get("acct-1").unwrap();
    assert_eq!(account.plan_tier.as_deref(), Some("growth"));
    assert_eq!(account.property_limit, Some(10));
    assert_eq!(account.subscription_status.as_deref(), Some("active"));

    // No organiser upgrade happened on the rentals path.
    assert_eq!(h.payments.count(), 0);
}

#[tokio::test]
async fn rentals_session_with_unknown_owner_is_skipped() {
    let h = TestHarness::new();
    let session = checkout_session(
        "cs_rent_2",
        "stranger@example.com",
        &[("productType", "rentals")],
    );

    let response = WebhookService::new(&h.ctx)
        .handle_event(completed_event(&session))
        .await
        .unwrap();
    assert_eq!(response.outcome, WebhookOutcome::Skipped);
}
