//! Poll phase - derived lifecycle state
//!
//! The phase is never persisted. It is computed on every read from the
//! persisted timing fields plus the current time, so the stored deadline
//! and the reported phase can never drift apart.

use chrono::{DateTime, Duration, Utc};

/// Lifecycle phase of a poll, derived from its timing fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    /// Voting is open; no deadline, or the deadline is comfortably ahead.
    Open,
    /// The deadline falls within the configured lookahead window.
    ClosingSoon,
    /// The deadline has passed but the organiser has not acted yet.
    Closed,
    /// A final date was chosen. Terminal.
    Finalized,
    /// The organiser cancelled the event. Terminal.
    Cancelled,
}

impl PollPhase {
    /// Compute the phase from persisted fields and the current time.
    ///
    /// Terminal flags win over any deadline arithmetic; a poll without a
    /// deadline never reports `ClosingSoon` or `Closed`.
    pub fn compute(
        now: DateTime<Utc>,
        deadline: Option<DateTime<Utc>>,
        finalized: bool,
        cancelled: bool,
        lookahead: Duration,
    ) -> Self {
        if cancelled {
            return Self::Cancelled;
        }
        if finalized {
            return Self::Finalized;
        }
        match deadline {
            None => Self::Open,
            Some(deadline) if deadline <= now => Self::Closed,
            Some(deadline) if deadline - now <= lookahead => Self::ClosingSoon,
            Some(_) => Self::Open,
        }
    }

    /// Whether this phase admits no further mutation.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finalized | Self::Cancelled)
    }

    /// Stable lowercase name used in API responses.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::ClosingSoon => "closing_soon",
            Self::Closed => "closed",
            Self::Finalized => "finalized",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for PollPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
