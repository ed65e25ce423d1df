//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in
//! setdate-core. Each repository handles database operations for a specific
//! domain entity.

mod error;
mod onboarding;
mod organiser;
mod partner;
mod payment;
mod poll;
mod rentals;
mod vote;

pub use onboarding::PgOnboardingRepository;
pub use organiser::PgOrganiserRepository;
pub use partner::PgPartnerRepository;
pub use payment::PgPaymentRepository;
pub use poll::PgPollRepository;
pub use rentals::PgRentalsRepository;
pub use vote::PgVoteRepository;
