//! Repository traits (ports)

mod repositories;

pub use repositories::{
    OnboardingRepository, OrganiserRepository, PartnerRepository, PaymentRepository,
    PollRepository, RentalsRepository, RepoResult, VoteRepository,
};
