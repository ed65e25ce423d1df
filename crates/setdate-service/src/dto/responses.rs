//! Response DTOs for serializing API outputs

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use setdate_core::entities::{Partner, Poll, VoteTally};
use setdate_core::value_objects::PollPhase;

/// Public view of a poll, with its derived phase and current tally
#[derive(Debug, Clone, Serialize)]
pub struct PollResponse {
    pub id: String,
    pub organiser_name: String,
    pub event_title: String,
    pub location: String,
    pub candidate_dates: Vec<NaiveDate>,
    pub deadline: Option<DateTime<Utc>>,
    pub phase: String,
    pub final_date: Option<NaiveDate>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl PollResponse {
    /// Build the public view; the edit token is deliberately excluded.
    pub fn from_poll(poll: &Poll, phase: PollPhase) -> Self {
        Self {
            id: poll.id.clone(),
            organiser_name: poll.organiser_name.clone(),
            event_title: poll.event_title.clone(),
            location: poll.location.clone(),
            candidate_dates: poll.candidate_dates.clone(),
            deadline: poll.deadline,
            phase: phase.as_str().to_string(),
            final_date: poll.final_date,
            cancelled_at: poll.cancelled_at,
            created_at: poll.created_at,
        }
    }
}

/// Response to poll creation; the only place the edit token is returned
#[derive(Debug, Clone, Serialize)]
pub struct CreatePollResponse {
    #[serde(flatten)]
    pub poll: PollResponse,
    pub edit_token: String,
}

/// Aggregate tally for a poll
#[derive(Debug, Clone, Serialize)]
pub struct TallyResponse {
    pub poll: PollResponse,
    pub tally: VoteTally,
    pub best_date: Option<NaiveDate>,
}

/// Acknowledgement of an accepted vote with the updated tally
#[derive(Debug, Clone, Serialize)]
pub struct VoteAccepted {
    pub poll_id: String,
    pub tally: VoteTally,
}

/// Organiser entitlement status
#[derive(Debug, Clone, Serialize)]
pub struct OrganiserStatusResponse {
    pub plan_type: String,
    pub polls_created_count: i64,
    pub unlocked: bool,
    pub free_poll_limit: i64,
    pub free_date_limit: usize,
}

/// Public view of a partner venue
#[derive(Debug, Clone, Serialize)]
pub struct PartnerResponse {
    pub slug: String,
    pub venue_name: String,
    pub contact_name: String,
    pub brand_color: String,
    pub city: String,
    pub full_address: String,
    pub venue_pitch: String,
    pub logo_url: String,
    pub booking_url: Option<String>,
    pub meal_tags: Vec<String>,
    pub gallery_photos: Vec<String>,
}

impl From<Partner> for PartnerResponse {
    fn from(partner: Partner) -> Self {
        Self {
            slug: partner.slug,
            venue_name: partner.venue_name,
            contact_name: partner.contact_name,
            brand_color: partner.brand_color,
            city: partner.city,
            full_address: partner.full_address,
            venue_pitch: partner.venue_pitch,
            logo_url: partner.logo_url,
            booking_url: partner.booking_url,
            meal_tags: partner.meal_tags,
            gallery_photos: partner.gallery_photos,
        }
    }
}

/// Status of an onboarding record, surfaced to the success page
#[derive(Debug, Clone, Serialize)]
pub struct OnboardingStatusResponse {
    pub session_id: String,
    pub status: String,
    pub onboarding_token: String,
    pub partner_slug: Option<String>,
}

/// Result of a successful claim-access exchange
#[derive(Debug, Clone, Serialize)]
pub struct ClaimAccessResponse {
    pub portal_token: String,
    pub portal_user_id: String,
    pub partner_slug: Option<String>,
}

/// What the webhook reconciler did with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookOutcome {
    /// Organiser upgraded to pro
    OrganiserUpgraded,
    /// Replayed session already recorded; nothing re-applied
    Duplicate,
    /// Rentals subscription fields merged
    RentalsUpdated,
    /// Event acknowledged but nothing matched (unknown owner, unpaid
    /// session, unhandled event type)
    Skipped,
}

/// Webhook acknowledgement body
#[derive(Debug, Clone, Serialize)]
pub struct WebhookResponse {
    pub received: bool,
    pub outcome: WebhookOutcome,
}

/// Counters from one reminder sweep run
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    /// Non-terminal polls examined
    pub scanned: usize,
    pub closing_soon_sent: usize,
    pub post_deadline_sent: usize,
    pub low_votes_sent: usize,
    /// Send or flag failures, logged and skipped
    pub errors: usize,
}
