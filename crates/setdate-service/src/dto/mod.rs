//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - The payment-processor event shapes consumed by the webhook reconciler

pub mod requests;
pub mod responses;
pub mod webhook;

// Re-export commonly used request types
pub use requests::{
    CancelPollRequest, ClaimAccessRequest, CreatePartnerRequest, CreatePollRequest,
    ExtendDeadlineRequest, FinalizePollRequest, OrganiserStatusRequest, RecordVoteRequest,
};

// Re-export commonly used response types
pub use responses::{
    ClaimAccessResponse, CreatePollResponse, OnboardingStatusResponse, OrganiserStatusResponse,
    PartnerResponse, PollResponse, SweepReport, TallyResponse, VoteAccepted, WebhookOutcome,
    WebhookResponse,
};

// Re-export webhook event shapes
pub use webhook::{CheckoutSession, CustomerDetails, StripeEvent, StripeEventData};
