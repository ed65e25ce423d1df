//! Vote entity - one respondent's availability answers against a poll

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single availability answer for one candidate date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteResponse {
    Yes,
    Maybe,
    No,
}

impl VoteResponse {
    /// Stable lowercase name, matching the persisted representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::Maybe => "maybe",
            Self::No => "no",
        }
    }
}

impl std::fmt::Display for VoteResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vote entity, keyed by (poll, voter_key).
///
/// At most one vote exists per voter key; resubmission replaces the whole
/// document rather than merging fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub poll_id: String,
    /// Normalised email (or stable anonymous id) identifying the voter.
    pub voter_key: String,
    pub voter_name: String,
    /// Per-candidate-date responses. BTreeMap keeps date order stable.
    pub responses: BTreeMap<NaiveDate, VoteResponse>,
    pub message: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(
        poll_id: String,
        voter_key: String,
        voter_name: String,
        responses: BTreeMap<NaiveDate, VoteResponse>,
        message: Option<String>,
    ) -> Self {
        Self {
            poll_id,
            voter_key,
            voter_name,
            responses,
            message,
            submitted_at: Utc::now(),
        }
    }
}

/// Aggregate tally of all votes for one poll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VoteTally {
    pub total_votes: usize,
    /// Per-date counts, keyed by candidate date.
    pub by_date: BTreeMap<NaiveDate, DateTally>,
}

/// Per-date yes/maybe/no counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateTally {
    pub yes: usize,
    pub maybe: usize,
    pub no: usize,
}

impl VoteTally {
    /// Aggregate a set of votes over the given candidate dates.
    ///
    /// Every candidate date appears in the output, including dates nobody
    /// answered, so callers can render a complete grid.
    pub fn aggregate(candidate_dates: &[NaiveDate], votes: &[Vote]) -> Self {
        let mut by_date: BTreeMap<NaiveDate, DateTally> = candidate_dates
            .iter()
            .map(|date| (*date, DateTally::default()))
            .collect();

        for vote in votes {
            for (date, response) in &vote.responses {
                if let Some(tally) = by_date.get_mut(date) {
                    match response {
                        VoteResponse::Yes => tally.yes += 1,
                        VoteResponse::Maybe => tally.maybe += 1,
                        VoteResponse::No => tally.no += 1,
                    }
                }
            }
        }

        Self {
            total_votes: votes.len(),
            by_date,
        }
    }

    /// The candidate date with the most yes answers, ties broken by the
    /// earlier date.
    pub fn best_date(&self) -> Option<NaiveDate> {
        self.by_date
            .iter()
            .max_by(|(date_a, a), (date_b, b)| {
                a.yes.cmp(&b.yes).then(date_b.cmp(date_a))
            })
            .filter(|(_, tally)| tally.yes > 0)
            .map(|(date, _)| *date)
    }
}
