//! Poll entity - a shareable proposal for an event with candidate dates

use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::DomainError;
use crate::value_objects::{generate_edit_token, PollPhase};

/// Poll entity.
///
/// The lifecycle phase is derived from the timing fields via
/// [`Poll::phase`]; only the terminal markers (`final_date`,
/// `cancelled_at`) and the reminder dispatch-flags are persisted state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poll {
    pub id: String,
    pub organiser_email: String,
    pub organiser_name: String,
    pub event_title: String,
    pub location: String,
    /// Ordered candidate dates offered to voters.
    pub candidate_dates: Vec<NaiveDate>,
    /// No deadline means the poll stays open indefinitely.
    pub deadline: Option<DateTime<Utc>>,
    /// Possession-based mutation secret; shareable by design.
    pub edit_token: String,
    pub final_date: Option<NaiveDate>,
    pub cancelled_at: Option<DateTime<Utc>>,
    // Reminder dispatch-flags, each monotonic false -> true until an
    // extension resets the deadline-bound pair.
    pub closing_soon_sent: bool,
    pub post_deadline_sent: bool,
    pub low_votes_reminder_count: i32,
    pub last_low_votes_reminder: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Poll {
    /// Create a new open poll with a fresh id and edit token.
    pub fn new(
        organiser_email: String,
        organiser_name: String,
        event_title: String,
        location: String,
        candidate_dates: Vec<NaiveDate>,
        deadline: Option<DateTime<Utc>>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            organiser_email,
            organiser_name,
            event_title,
            location,
            candidate_dates,
            deadline,
            edit_token: generate_edit_token(),
            final_date: None,
            cancelled_at: None,
            closing_soon_sent: false,
            post_deadline_sent: false,
            low_votes_reminder_count: 0,
            last_low_votes_reminder: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Derived lifecycle phase at `now`.
    pub fn phase(&self, now: DateTime<Utc>, lookahead: Duration) -> PollPhase {
        PollPhase::compute(
            now,
            self.deadline,
            self.final_date.is_some(),
            self.cancelled_at.is_some(),
            lookahead,
        )
    }

    /// Whether the poll reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.final_date.is_some() || self.cancelled_at.is_some()
    }

    /// Reject mutation attempts on terminal polls.
    ///
    /// Finalized and cancelled are distinguished so callers can surface
    /// the precise conflict.
    pub fn ensure_mutable(&self) -> Result<(), DomainError> {
        if self.cancelled_at.is_some() {
            return Err(DomainError::PollAlreadyCancelled);
        }
        if self.final_date.is_some() {
            return Err(DomainError::PollAlreadyFinalized);
        }
        Ok(())
    }

    /// Check the possession-based mutation secret.
    pub fn verify_edit_token(&self, token: &str) -> Result<(), DomainError> {
        if self.edit_token == token {
            Ok(())
        } else {
            Err(DomainError::EditTokenMismatch)
        }
    }

    /// Whether `date` is one of the offered candidate dates.
    pub fn is_candidate_date(&self, date: NaiveDate) -> bool {
        self.candidate_dates.contains(&date)
    }

    /// Poll age at `now`, saturating at zero for clock skew.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.created_at).max(Duration::zero())
    }
}
