//! Organiser entitlement entity - plan tier and usage counters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Organiser plan tier.
///
/// The core only ever moves free -> pro; downgrades are an external
/// administrative action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    #[default]
    Free,
    Pro,
}

impl PlanType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
        }
    }
}

impl std::fmt::Display for PlanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Organiser entitlement record, keyed by the salted hash of the
/// normalised email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organiser {
    /// Salted SHA-256 hash of the normalised email.
    pub id: String,
    /// Normalised email address.
    pub email: String,
    pub plan_type: PlanType,
    /// Monotonic counter; incremented atomically at the storage layer.
    pub polls_created_count: i64,
    pub stripe_customer_id: Option<String>,
    pub last_stripe_session_id: Option<String>,
    pub last_upgrade_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Organiser {
    /// Create a fresh free-plan record.
    pub fn new(id: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            plan_type: PlanType::Free,
            polls_created_count: 0,
            stripe_customer_id: None,
            last_stripe_session_id: None,
            last_upgrade_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Derived flag: pro organisers are unlocked from free-plan gating.
    pub fn unlocked(&self) -> bool {
        self.plan_type == PlanType::Pro
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_organiser_defaults() {
        let organiser = Organiser::new("abc123".to_string(), "a@x.com".to_string());
        assert_eq!(organiser.plan_type, PlanType::Free);
        assert_eq!(organiser.polls_created_count, 0);
        assert!(!organiser.unlocked());
        assert!(organiser.stripe_customer_id.is_none());
    }

    #[test]
    fn test_unlocked_follows_plan() {
        let mut organiser = Organiser::new("abc".to_string(), "a@x.com".to_string());
        organiser.plan_type = PlanType::Pro;
        assert!(organiser.unlocked());
    }

    #[test]
    fn test_plan_type_serde_names() {
        assert_eq!(serde_json::to_string(&PlanType::Pro).unwrap(), "\"pro\"");
        let parsed: PlanType = serde_json::from_str("\"free\"").unwrap();
        assert_eq!(parsed, PlanType::Free);
    }
}
