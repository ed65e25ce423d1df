//! Domain entities - core business objects

mod onboarding;
mod organiser;
mod partner;
mod payment;
mod poll;
mod rentals;
mod vote;

pub use onboarding::{OnboardingRecord, OnboardingStatus};
pub use organiser::{Organiser, PlanType};
pub use partner::{slugify, Partner, DEFAULT_BRAND_COLOR, MAX_GALLERY_PHOTOS, MAX_MEAL_TAGS};
pub use payment::Payment;
pub use poll::Poll;
pub use rentals::{RentalsAccount, RentalsSubscriptionUpdate};
pub use vote::{DateTally, Vote, VoteResponse, VoteTally};
