//! Database models - SQLx-compatible structs for PostgreSQL tables

mod onboarding;
mod organiser;
mod partner;
mod payment;
mod poll;
mod rentals;
mod vote;

pub use onboarding::OnboardingModel;
pub use organiser::OrganiserModel;
pub use partner::PartnerModel;
pub use payment::PaymentModel;
pub use poll::PollModel;
pub use rentals::RentalsModel;
pub use vote::VoteModel;
