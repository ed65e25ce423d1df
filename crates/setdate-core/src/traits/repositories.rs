//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Methods that encode a state-machine
//! precondition (terminal checks, one-time claims, dispatch-flags) return
//! `bool`: `true` means the conditional write applied, `false` means the
//! precondition no longer held. That keeps compare-and-swap semantics in
//! the storage layer instead of read-then-write in application code.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::entities::{
    OnboardingRecord, Organiser, Partner, Payment, Poll, RentalsAccount,
    RentalsSubscriptionUpdate, Vote,
};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Poll Repository
// ============================================================================

#[async_trait]
pub trait PollRepository: Send + Sync {
    /// Find a poll by id
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Poll>>;

    /// Persist a new poll
    async fn create(&self, poll: &Poll) -> RepoResult<()>;

    /// All polls that are not terminal (no final date, not cancelled)
    async fn list_active(&self) -> RepoResult<Vec<Poll>>;

    /// Set the final date. Conditional on the poll not being terminal.
    async fn set_final_date(&self, id: &str, final_date: NaiveDate) -> RepoResult<bool>;

    /// Mark the poll cancelled. Conditional on the poll not being terminal.
    async fn set_cancelled(&self, id: &str, cancelled_at: DateTime<Utc>) -> RepoResult<bool>;

    /// Push the deadline and reset both deadline-bound dispatch-flags.
    /// Conditional on the poll not being terminal.
    async fn extend_deadline(&self, id: &str, new_deadline: DateTime<Utc>) -> RepoResult<bool>;

    /// Flip `closing_soon_sent` false -> true. Returns `false` when the
    /// flag was already set (another sweep got there first).
    async fn mark_closing_soon_sent(&self, id: &str) -> RepoResult<bool>;

    /// Flip `post_deadline_sent` false -> true.
    async fn mark_post_deadline_sent(&self, id: &str) -> RepoResult<bool>;

    /// Increment the low-votes reminder counter and stamp the send time.
    async fn record_low_votes_reminder(&self, id: &str, at: DateTime<Utc>) -> RepoResult<()>;
}

// ============================================================================
// Vote Repository
// ============================================================================

#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// Insert or fully replace the vote keyed by (poll_id, voter_key).
    async fn upsert(&self, vote: &Vote) -> RepoResult<()>;

    /// All votes for a poll, oldest first.
    async fn list_for_poll(&self, poll_id: &str) -> RepoResult<Vec<Vote>>;

    /// Number of votes excluding the given voter key (used to exclude the
    /// organiser's own vote from reminder thresholds).
    async fn count_excluding(&self, poll_id: &str, voter_key: &str) -> RepoResult<i64>;
}

// ============================================================================
// Organiser (Entitlement) Repository
// ============================================================================

#[async_trait]
pub trait OrganiserRepository: Send + Sync {
    /// Find an organiser record by its hashed identity key.
    async fn find(&self, id: &str) -> RepoResult<Option<Organiser>>;

    /// Idempotent create: insert the record if absent, then return the
    /// stored record. Concurrent callers collapse on the identity key.
    async fn ensure(&self, organiser: &Organiser) -> RepoResult<Organiser>;

    /// Atomically increment `polls_created_count`, creating a free-plan
    /// record on first use, and return the post-increment record. Must be
    /// a single atomic operation, never read-modify-write.
    async fn increment_polls_created(&self, id: &str, email: &str) -> RepoResult<Organiser>;

    /// Upsert to pro plan: sets plan, upgrade timestamp, customer and
    /// session ids. Idempotent for an already-pro organiser.
    async fn mark_upgraded(
        &self,
        id: &str,
        email: &str,
        stripe_customer_id: Option<&str>,
        session_id: &str,
    ) -> RepoResult<Organiser>;
}

// ============================================================================
// Onboarding Repository
// ============================================================================

#[async_trait]
pub trait OnboardingRepository: Send + Sync {
    /// Find by payment session id.
    async fn find_by_session(&self, session_id: &str) -> RepoResult<Option<OnboardingRecord>>;

    /// Insert the record unless one already exists for its session id, and
    /// return the stored record either way (replay-safe create).
    async fn create_if_absent(&self, record: &OnboardingRecord) -> RepoResult<OnboardingRecord>;

    /// Point lookup by claim token.
    async fn find_by_token(&self, token: &str) -> RepoResult<Option<OnboardingRecord>>;

    /// Compare-and-swap completion: move `token_issued -> partner_created`
    /// recording the partner. Returns `false` when the record was not in
    /// `token_issued` (already claimed).
    async fn complete(&self, token: &str, partner_id: &str, slug: &str) -> RepoResult<bool>;

    /// Record the portal user minted by the claim-access flow.
    async fn set_portal_user(&self, token: &str, portal_user_id: &str) -> RepoResult<()>;
}

// ============================================================================
// Partner Repository
// ============================================================================

#[async_trait]
pub trait PartnerRepository: Send + Sync {
    /// Persist a new partner. Fails with `SlugAlreadyExists` on key clash.
    async fn create(&self, partner: &Partner) -> RepoResult<()>;

    /// Find a partner by slug.
    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Partner>>;

    /// Whether a slug is taken (used by unique-slug allocation).
    async fn slug_exists(&self, slug: &str) -> RepoResult<bool>;
}

// ============================================================================
// Payment Repository
// ============================================================================

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Find a payment by checkout session id.
    async fn find_by_session(&self, session_id: &str) -> RepoResult<Option<Payment>>;

    /// Insert or merge the payment for its session id.
    async fn upsert(&self, payment: &Payment) -> RepoResult<()>;
}

// ============================================================================
// Rentals Repository
// ============================================================================

#[async_trait]
pub trait RentalsRepository: Send + Sync {
    /// Find a rentals account by its id.
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<RentalsAccount>>;

    /// Find a rentals account by normalised owner email.
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<RentalsAccount>>;

    /// Merge subscription fields into the account; `None` fields are left
    /// untouched.
    async fn apply_subscription(
        &self,
        id: &str,
        update: &RentalsSubscriptionUpdate,
    ) -> RepoResult<()>;
}
