//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and, where there is anything to
//! check, `Validate` for input validation.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use validator::Validate;

use setdate_core::entities::VoteResponse;

// ============================================================================
// Poll Requests
// ============================================================================

/// Create poll request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePollRequest {
    #[validate(email(message = "Invalid email format"))]
    pub organiser_email: String,

    #[validate(length(min = 1, max = 80, message = "Organiser name must be 1-80 characters"))]
    pub organiser_name: String,

    #[validate(length(min = 1, max = 120, message = "Event title must be 1-120 characters"))]
    pub event_title: String,

    #[validate(length(max = 160, message = "Location must be at most 160 characters"))]
    #[serde(default)]
    pub location: String,

    /// Candidate dates offered to voters; at least one required.
    pub candidate_dates: Vec<NaiveDate>,

    /// Optional voting deadline; absent means the poll stays open.
    pub deadline: Option<DateTime<Utc>>,
}

/// Record (or replace) a vote
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordVoteRequest {
    #[validate(email(message = "Invalid email format"))]
    pub voter_email: String,

    #[validate(length(min = 1, max = 80, message = "Voter name must be 1-80 characters"))]
    pub voter_name: String,

    /// Response per candidate date; dates outside the poll's candidates
    /// are rejected.
    pub responses: BTreeMap<NaiveDate, VoteResponse>,

    #[validate(length(max = 500, message = "Message must be at most 500 characters"))]
    pub message: Option<String>,
}

/// Finalize a poll on one of its candidate dates
#[derive(Debug, Clone, Deserialize)]
pub struct FinalizePollRequest {
    pub edit_token: String,
    pub final_date: NaiveDate,
}

/// Cancel a poll
#[derive(Debug, Clone, Deserialize)]
pub struct CancelPollRequest {
    pub edit_token: String,
}

/// Push the deadline out and re-arm the deadline reminders
#[derive(Debug, Clone, Deserialize)]
pub struct ExtendDeadlineRequest {
    pub edit_token: String,
    pub new_deadline: DateTime<Utc>,
}

// ============================================================================
// Organiser Requests
// ============================================================================

/// Look up an organiser's entitlement
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OrganiserStatusRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

// ============================================================================
// Partner Requests
// ============================================================================

/// Create a partner venue from a one-time onboarding token
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePartnerRequest {
    pub token: String,

    #[validate(length(min = 1, max = 100, message = "Venue name must be 1-100 characters"))]
    pub venue_name: String,

    #[validate(length(max = 80, message = "Contact name must be at most 80 characters"))]
    #[serde(default)]
    pub contact_name: String,

    /// Brand color as a #rrggbb hex string; defaults when absent.
    pub brand_color: Option<String>,

    #[validate(length(min = 1, max = 80, message = "City must be 1-80 characters"))]
    pub city: String,

    #[validate(length(max = 200, message = "Address must be at most 200 characters"))]
    #[serde(default)]
    pub full_address: String,

    #[validate(length(max = 600, message = "Pitch must be at most 600 characters"))]
    #[serde(default)]
    pub venue_pitch: String,

    #[serde(default)]
    pub logo_url: String,

    pub booking_url: Option<String>,

    /// Meal availability tags; normalised, deduped, and capped.
    #[serde(default)]
    pub meal_tags: Vec<String>,

    /// Gallery photo URLs; capped.
    #[serde(default)]
    pub gallery_photos: Vec<String>,
}

/// Exchange an onboarding token for a portal credential
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimAccessRequest {
    pub token: String,
}
