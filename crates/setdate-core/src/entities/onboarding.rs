//! Partner onboarding record - binds a payment session to a one-time claim

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::generate_onboarding_token;

/// Status of an onboarding record.
///
/// `TokenIssued -> PartnerCreated` happens exactly once per record; the
/// transition is the single linearization point for partner creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStatus {
    TokenIssued,
    PartnerCreated,
}

impl OnboardingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TokenIssued => "token_issued",
            Self::PartnerCreated => "partner_created",
        }
    }
}

impl std::fmt::Display for OnboardingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One onboarding record per payment session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingRecord {
    /// Payment session id; the storage key, which makes record creation
    /// naturally idempotent under webhook replays.
    pub session_id: String,
    pub stripe_customer_id: Option<String>,
    pub customer_email: String,
    pub customer_name: String,
    /// High-entropy one-time claim token.
    pub onboarding_token: String,
    pub status: OnboardingStatus,
    pub partner_id: Option<String>,
    pub partner_slug: Option<String>,
    /// Portal user minted by the claim-access flow, if any.
    pub portal_user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OnboardingRecord {
    /// Create a fresh record in the `token_issued` state with a newly
    /// minted token.
    pub fn new(
        session_id: String,
        stripe_customer_id: Option<String>,
        customer_email: String,
        customer_name: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            stripe_customer_id,
            customer_email,
            customer_name,
            onboarding_token: generate_onboarding_token(),
            status: OnboardingStatus::TokenIssued,
            partner_id: None,
            partner_slug: None,
            portal_user_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the one-time claim has already been consumed.
    pub fn is_claimed(&self) -> bool {
        self.status == OnboardingStatus::PartnerCreated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{ONBOARDING_TOKEN_LEN, TOKEN_ALPHABET};

    #[test]
    fn test_new_record_is_token_issued() {
        let record = OnboardingRecord::new(
            "cs_test_123".to_string(),
            Some("cus_456".to_string()),
            "venue@example.com".to_string(),
            "The Old Crown".to_string(),
        );
        assert_eq!(record.status, OnboardingStatus::TokenIssued);
        assert!(!record.is_claimed());
        assert!(record.partner_id.is_none());
        assert_eq!(record.onboarding_token.len(), ONBOARDING_TOKEN_LEN);
        assert!(record
            .onboarding_token
            .bytes()
            .all(|b| TOKEN_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_claimed_after_partner_created() {
        let mut record = OnboardingRecord::new(
            "cs_test_123".to_string(),
            None,
            "venue@example.com".to_string(),
            String::new(),
        );
        record.status = OnboardingStatus::PartnerCreated;
        assert!(record.is_claimed());
    }

    #[test]
    fn test_status_serde_names() {
        let json = serde_json::to_string(&OnboardingStatus::PartnerCreated).unwrap();
        assert_eq!(json, "\"partner_created\"");
    }
}
