//! Poll database model

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// Database model for polls table
#[derive(Debug, Clone, FromRow)]
pub struct PollModel {
    pub id: String,
    pub organiser_email: String,
    pub organiser_name: String,
    pub event_title: String,
    pub location: String,
    pub candidate_dates: Vec<NaiveDate>,
    pub deadline: Option<DateTime<Utc>>,
    pub edit_token: String,
    pub final_date: Option<NaiveDate>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub closing_soon_sent: bool,
    pub post_deadline_sent: bool,
    pub low_votes_reminder_count: i32,
    pub last_low_votes_reminder: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PollModel {
    /// Check if the poll reached a terminal state
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.final_date.is_some() || self.cancelled_at.is_some()
    }
}
