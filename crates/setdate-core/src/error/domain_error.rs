//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Poll not found: {0}")]
    PollNotFound(String),

    #[error("Organiser record not found")]
    OrganiserNotFound,

    #[error("Partner not found: {0}")]
    PartnerNotFound(String),

    #[error("Onboarding record not found for session: {0}")]
    OnboardingSessionNotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Date {0} is not one of the poll's candidate dates")]
    DateNotCandidate(String),

    #[error("Deadline must be in the future")]
    DeadlineInPast,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Edit token does not match")]
    EditTokenMismatch,

    #[error("Invalid onboarding token")]
    InvalidOnboardingToken,

    // =========================================================================
    // Conflict / State-Machine Errors
    // =========================================================================
    #[error("Poll is already finalized")]
    PollAlreadyFinalized,

    #[error("Poll is already cancelled")]
    PollAlreadyCancelled,

    #[error("Onboarding token has already been used")]
    OnboardingAlreadyClaimed,

    #[error("Partner slug already exists: {0}")]
    SlugAlreadyExists(String),

    #[error("Free plan poll limit reached")]
    PollLimitReached,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Database unavailable: {0}")]
    DatabaseUnavailable(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::PollNotFound(_) => "UNKNOWN_POLL",
            Self::OrganiserNotFound => "UNKNOWN_ORGANISER",
            Self::PartnerNotFound(_) => "UNKNOWN_PARTNER",
            Self::OnboardingSessionNotFound(_) => "UNKNOWN_ONBOARDING_SESSION",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::DateNotCandidate(_) => "DATE_NOT_CANDIDATE",
            Self::DeadlineInPast => "DEADLINE_IN_PAST",

            // Authorization
            Self::EditTokenMismatch => "EDIT_TOKEN_MISMATCH",
            Self::InvalidOnboardingToken => "INVALID_ONBOARDING_TOKEN",

            // Conflict
            Self::PollAlreadyFinalized => "POLL_ALREADY_FINALIZED",
            Self::PollAlreadyCancelled => "POLL_ALREADY_CANCELLED",
            Self::OnboardingAlreadyClaimed => "ONBOARDING_ALREADY_CLAIMED",
            Self::SlugAlreadyExists(_) => "SLUG_ALREADY_EXISTS",
            Self::PollLimitReached => "POLL_LIMIT_REACHED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::DatabaseUnavailable(_) => "DATABASE_UNAVAILABLE",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::PollNotFound(_)
                | Self::OrganiserNotFound
                | Self::PartnerNotFound(_)
                | Self::OnboardingSessionNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidEmail
                | Self::DateNotCandidate(_)
                | Self::DeadlineInPast
        )
    }

    /// Check if this is an authorization error
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::EditTokenMismatch | Self::InvalidOnboardingToken)
    }

    /// Check if this is a conflict / state-machine precondition error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::PollAlreadyFinalized
                | Self::PollAlreadyCancelled
                | Self::OnboardingAlreadyClaimed
                | Self::SlugAlreadyExists(_)
                | Self::PollLimitReached
        )
    }

    /// Check if this error is safe to retry (external collaborator or
    /// connection-pool hiccup)
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ExternalService(_) | Self::DatabaseUnavailable(_))
    }
}
