//! Error handling utilities for repositories

use setdate_core::error::DomainError;
use sqlx::Error as SqlxError;

use crate::pool::is_transient_error;

/// Convert SQLx error to DomainError
///
/// Pool-level hiccups map to the transient variant so the service layer
/// can tell "retry later" apart from a failed statement.
pub fn map_db_error(e: SqlxError) -> DomainError {
    if is_transient_error(&e) {
        return DomainError::DatabaseUnavailable(e.to_string());
    }
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    map_db_error(e)
}

/// Create a "poll not found" error
pub fn poll_not_found(id: &str) -> DomainError {
    DomainError::PollNotFound(id.to_string())
}

/// Create an "onboarding session not found" error
pub fn onboarding_not_found(session_id: &str) -> DomainError {
    DomainError::OnboardingSessionNotFound(session_id.to_string())
}

/// Create a "rentals account not found" error
pub fn rentals_not_found() -> DomainError {
    DomainError::DatabaseError("Rentals account not found".to_string())
}
