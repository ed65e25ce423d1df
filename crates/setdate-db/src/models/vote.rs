//! Vote database model

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::FromRow;

use setdate_core::entities::VoteResponse;

/// Database model for votes table
///
/// The per-date responses are stored as a JSONB object keyed by ISO date.
#[derive(Debug, Clone, FromRow)]
pub struct VoteModel {
    pub poll_id: String,
    pub voter_key: String,
    pub voter_name: String,
    pub responses: Json<BTreeMap<NaiveDate, VoteResponse>>,
    pub message: Option<String>,
    pub submitted_at: DateTime<Utc>,
}
