//! # setdate-core
//!
//! Domain layer containing entities, value objects, repository traits, and
//! domain errors for the date-picking service. This crate has zero
//! dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    slugify, DateTally, OnboardingRecord, OnboardingStatus, Organiser, Partner, Payment, PlanType,
    Poll, RentalsAccount, RentalsSubscriptionUpdate, Vote, VoteResponse, VoteTally,
};
pub use error::DomainError;
pub use traits::{
    OnboardingRepository, OrganiserRepository, PartnerRepository, PaymentRepository,
    PollRepository, RentalsRepository, RepoResult, VoteRepository,
};
pub use value_objects::{
    generate_edit_token, generate_onboarding_token, normalise_email, organiser_id_from_email,
    PollPhase, EDIT_TOKEN_LEN, ONBOARDING_TOKEN_LEN, TOKEN_ALPHABET,
};
