//! # setdate-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for all repository traits
//! defined in `setdate-core`. It handles:
//!
//! - Connection pool management
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations
//!
//! Conditional state transitions (finalize, cancel, one-time claims,
//! dispatch-flags) are expressed as guarded `UPDATE ... WHERE` statements,
//! so the at-most-once guarantees hold under concurrent callers without
//! any read-modify-write in application code.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use setdate_db::pool::{create_pool, DatabaseConfig};
//! use setdate_db::repositories::PgPollRepository;
//! use setdate_core::traits::PollRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     let poll_repo = PgPollRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, DatabaseConfig, PgPool};
pub use repositories::{
    PgOnboardingRepository, PgOrganiserRepository, PgPartnerRepository, PgPaymentRepository,
    PgPollRepository, PgRentalsRepository, PgVoteRepository,
};
