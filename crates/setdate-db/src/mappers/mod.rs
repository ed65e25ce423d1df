//! Entity <-> model mappers
//!
//! Conversions between database models and domain entities.

mod onboarding;
mod organiser;
mod partner;
mod payment;
mod poll;
mod rentals;
mod vote;
