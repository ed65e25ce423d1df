//! Value objects - immutable types that represent domain concepts

mod email;
mod phase;
mod token;

pub use email::{normalise_email, organiser_id_from_email};
pub use phase::PollPhase;
pub use token::{
    generate_edit_token, generate_onboarding_token, EDIT_TOKEN_LEN, ONBOARDING_TOKEN_LEN,
    TOKEN_ALPHABET,
};
