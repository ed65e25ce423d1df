//! Payment-processor event shapes
//!
//! Deserialized views of the webhook payload. Only the fields the
//! reconciler consumes are modeled; everything else passes through
//! untouched.

use std::collections::HashMap;

use serde::Deserialize;

/// Top-level webhook event envelope
#[derive(Debug, Clone, Deserialize)]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

/// Event payload wrapper
#[derive(Debug, Clone, Deserialize)]
pub struct StripeEventData {
    /// The raw object; parsed into [`CheckoutSession`] for the event
    /// types the reconciler handles.
    pub object: serde_json::Value,
}

/// Customer details attached to a checkout session
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerDetails {
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Completed checkout session
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub customer: Option<String>,
    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,
    pub customer_email: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    pub payment_status: Option<String>,
    pub status: Option<String>,
    pub amount_total: Option<i64>,
    pub currency: Option<String>,
    pub subscription: Option<String>,
}

impl CheckoutSession {
    /// Resolve the customer email: checkout details first, then the
    /// top-level field, then metadata.
    pub fn resolved_email(&self) -> Option<&str> {
        self.customer_details
            .as_ref()
            .and_then(|d| d.email.as_deref())
            .or(self.customer_email.as_deref())
            .or_else(|| self.metadata.get("organiserEmail").map(String::as_str))
    }

    /// Resolve the customer display name, if any.
    pub fn resolved_name(&self) -> Option<&str> {
        self.customer_details
            .as_ref()
            .and_then(|d| d.name.as_deref())
    }

    /// Product tag carried in metadata; absent means the default
    /// organiser-upgrade product.
    pub fn product_type(&self) -> Option<&str> {
        self.metadata.get("productType").map(String::as_str)
    }

    /// Whether the session represents settled payment.
    pub fn is_paid(&self) -> bool {
        matches!(self.payment_status.as_deref(), Some("paid" | "no_payment_required"))
            || matches!(self.status.as_deref(), Some("complete"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_session_deserializes() {
        let json = r#"{
            "id": "cs_test_123",
            "customer": "cus_456",
            "customer_details": {"email": "a@x.com", "name": "Alex"},
            "customer_email": null,
            "metadata": {"productType": "rentals", "accountId": "acct-1"},
            "payment_status": "paid",
            "status": "complete",
            "amount_total": 4900,
            "currency": "gbp",
            "subscription": "sub_789"
        }"#;
        let session: CheckoutSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.resolved_email(), Some("a@x.com"));
        assert_eq!(session.product_type(), Some("rentals"));
        assert!(session.is_paid());
    }

    #[test]
    fn test_email_falls_back_to_metadata() {
        let json = r#"{
            "id": "cs_test_123",
            "customer": null,
            "customer_email": null,
            "metadata": {"organiserEmail": "org@x.com"},
            "payment_status": "paid",
            "status": null,
            "amount_total": null,
            "currency": null,
            "subscription": null
        }"#;
        let session: CheckoutSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.resolved_email(), Some("org@x.com"));
        assert_eq!(session.product_type(), None);
    }

    #[test]
    fn test_event_envelope() {
        let json = r#"{
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": {"object": {"id": "cs_test_123"}}
        }"#;
        let event: StripeEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, "checkout.session.completed");
        assert_eq!(event.data.object["id"], "cs_test_123");
    }
}
