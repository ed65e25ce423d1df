//! Integration test utilities
//!
//! Provides in-memory repository fixtures and a recording mailer so
//! service-level behaviour can be tested without PostgreSQL or a live
//! email provider.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
