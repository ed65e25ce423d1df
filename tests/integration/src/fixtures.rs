//! In-memory repository fixtures
//!
//! Each fixture mirrors the conditional-write semantics of its
//! PostgreSQL counterpart: guarded updates return `false` when the
//! precondition no longer holds, and the one-time claims are
//! compare-and-swap under the fixture's lock.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;

use setdate_core::entities::{
    OnboardingRecord, OnboardingStatus, Organiser, Partner, Payment, PlanType, Poll,
    RentalsAccount, RentalsSubscriptionUpdate, Vote,
};
use setdate_core::error::DomainError;
use setdate_core::traits::{
    OnboardingRepository, OrganiserRepository, PartnerRepository, PaymentRepository,
    PollRepository, RentalsRepository, RepoResult, VoteRepository,
};
use setdate_service::{EmailMessage, Mailer, MailerError};

// ============================================================================
// Poll Repository
// ============================================================================

/// In-memory PollRepository
#[derive(Default)]
pub struct InMemoryPollRepository {
    polls: Mutex<HashMap<String, Poll>>,
}

impl InMemoryPollRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Direct read for assertions
    pub fn get(&self, id: &str) -> Option<Poll> {
        self.polls.lock().get(id).cloned()
    }

    /// Direct write for test setup
    pub fn put(&self, poll: Poll) {
        self.polls.lock().insert(poll.id.clone(), poll);
    }
}

#[async_trait]
impl PollRepository for InMemoryPollRepository {
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Poll>> {
        Ok(self.polls.lock().get(id).cloned())
    }

    async fn create(&self, poll: &Poll) -> RepoResult<()> {
        self.polls.lock().insert(poll.id.clone(), poll.clone());
        Ok(())
    }

    async fn list_active(&self) -> RepoResult<Vec<Poll>> {
        let mut polls: Vec<Poll> = self
            .polls
            .lock()
            .values()
            .filter(|p| !p.is_terminal())
            .cloned()
            .collect();
        polls.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(polls)
    }

    async fn set_final_date(&self, id: &str, final_date: NaiveDate) -> RepoResult<bool> {
        let mut polls = self.polls.lock();
        match polls.get_mut(id) {
            Some(poll) if !poll.is_terminal() => {
                poll.final_date = Some(final_date);
                poll.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn set_cancelled(&self, id: &str, cancelled_at: DateTime<Utc>) -> RepoResult<bool> {
        let mut polls = self.polls.lock();
        match polls.get_mut(id) {
            Some(poll) if !poll.is_terminal() => {
                poll.cancelled_at = Some(cancelled_at);
                poll.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn extend_deadline(&self, id: &str, new_deadline: DateTime<Utc>) -> RepoResult<bool> {
        let mut polls = self.polls.lock();
        match polls.get_mut(id) {
            Some(poll) if !poll.is_terminal() => {
                poll.deadline = Some(new_deadline);
                poll.closing_soon_sent = false;
                poll.post_deadline_sent = false;
                poll.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_closing_soon_sent(&self, id: &str) -> RepoResult<bool> {
        let mut polls = self.polls.lock();
        match polls.get_mut(id) {
            Some(poll) if !poll.closing_soon_sent => {
                poll.closing_soon_sent = true;
                poll.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_post_deadline_sent(&self, id: &str) -> RepoResult<bool> {
        let mut polls = self.polls.lock();
        match polls.get_mut(id) {
            Some(poll) if !poll.post_deadline_sent => {
                poll.post_deadline_sent = true;
                poll.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn record_low_votes_reminder(&self, id: &str, at: DateTime<Utc>) -> RepoResult<()> {
        let mut polls = self.polls.lock();
        let poll = polls
            .get_mut(id)
            .ok_or_else(|| DomainError::PollNotFound(id.to_string()))?;
        poll.low_votes_reminder_count += 1;
        poll.last_low_votes_reminder = Some(at);
        poll.updated_at = Utc::now();
        Ok(())
    }
}

// ============================================================================
// Vote Repository
// ============================================================================

/// In-memory VoteRepository keyed by (poll_id, voter_key)
#[derive(Default)]
pub struct InMemoryVoteRepository {
    votes: Mutex<HashMap<(String, String), Vote>>,
}

impl InMemoryVoteRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn get(&self, poll_id: &str, voter_key: &str) -> Option<Vote> {
        self.votes
            .lock()
            .get(&(poll_id.to_string(), voter_key.to_string()))
            .cloned()
    }
}

#[async_trait]
impl VoteRepository for InMemoryVoteRepository {
    async fn upsert(&self, vote: &Vote) -> RepoResult<()> {
        self.votes
            .lock()
            .insert((vote.poll_id.clone(), vote.voter_key.clone()), vote.clone());
        Ok(())
    }

    async fn list_for_poll(&self, poll_id: &str) -> RepoResult<Vec<Vote>> {
        let mut votes: Vec<Vote> = self
            .votes
            .lock()
            .values()
            .filter(|v| v.poll_id == poll_id)
            .cloned()
            .collect();
        votes.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
        Ok(votes)
    }

    async fn count_excluding(&self, poll_id: &str, voter_key: &str) -> RepoResult<i64> {
        let count = self
            .votes
            .lock()
            .values()
            .filter(|v| v.poll_id == poll_id && v.voter_key != voter_key)
            .count();
        Ok(count as i64)
    }
}

// ============================================================================
// Organiser Repository
// ============================================================================

/// In-memory OrganiserRepository
///
/// `fail_next_upgrade` makes the next `mark_upgraded` error once, to
/// exercise redelivery after a partial webhook failure.
#[derive(Default)]
pub struct InMemoryOrganiserRepository {
    organisers: Mutex<HashMap<String, Organiser>>,
    fail_next_upgrade: Mutex<bool>,
}

impl InMemoryOrganiserRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn get(&self, id: &str) -> Option<Organiser> {
        self.organisers.lock().get(id).cloned()
    }

    /// Make the next `mark_upgraded` call fail with a transient error
    pub fn fail_next_upgrade(&self) {
        *self.fail_next_upgrade.lock() = true;
    }
}

#[async_trait]
impl OrganiserRepository for InMemoryOrganiserRepository {
    async fn find(&self, id: &str) -> RepoResult<Option<Organiser>> {
        Ok(self.organisers.lock().get(id).cloned())
    }

    async fn ensure(&self, organiser: &Organiser) -> RepoResult<Organiser> {
        let mut organisers = self.organisers.lock();
        let stored = organisers
            .entry(organiser.id.clone())
            .or_insert_with(|| organiser.clone());
        Ok(stored.clone())
    }

    async fn increment_polls_created(&self, id: &str, email: &str) -> RepoResult<Organiser> {
        let mut organisers = self.organisers.lock();
        let organiser = organisers
            .entry(id.to_string())
            .or_insert_with(|| Organiser::new(id.to_string(), email.to_string()));
        organiser.polls_created_count += 1;
        organiser.updated_at = Utc::now();
        Ok(organiser.clone())
    }

    async fn mark_upgraded(
        &self,
        id: &str,
        email: &str,
        stripe_customer_id: Option<&str>,
        session_id: &str,
    ) -> RepoResult<Organiser> {
        {
            let mut fail = self.fail_next_upgrade.lock();
            if *fail {
                *fail = false;
                return Err(DomainError::DatabaseUnavailable(
                    "connection reset".to_string(),
                ));
            }
        }
        let mut organisers = self.organisers.lock();
        let organiser = organisers
            .entry(id.to_string())
            .or_insert_with(|| Organiser::new(id.to_string(), email.to_string()));
        organiser.plan_type = PlanType::Pro;
        if let Some(customer) = stripe_customer_id {
            organiser.stripe_customer_id = Some(customer.to_string());
        }
        organiser.last_stripe_session_id = Some(session_id.to_string());
        organiser.last_upgrade_at = Some(Utc::now());
        organiser.updated_at = Utc::now();
        Ok(organiser.clone())
    }
}

// ============================================================================
// Onboarding Repository
// ============================================================================

/// In-memory OnboardingRepository keyed by session id
#[derive(Default)]
pub struct InMemoryOnboardingRepository {
    records: Mutex<HashMap<String, OnboardingRecord>>,
}

impl InMemoryOnboardingRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn get(&self, session_id: &str) -> Option<OnboardingRecord> {
        self.records.lock().get(session_id).cloned()
    }

    pub fn put(&self, record: OnboardingRecord) {
        self.records.lock().insert(record.session_id.clone(), record);
    }
}

#[async_trait]
impl OnboardingRepository for InMemoryOnboardingRepository {
    async fn find_by_session(&self, session_id: &str) -> RepoResult<Option<OnboardingRecord>> {
        Ok(self.records.lock().get(session_id).cloned())
    }

    async fn create_if_absent(&self, record: &OnboardingRecord) -> RepoResult<OnboardingRecord> {
        let mut records = self.records.lock();
        let stored = records
            .entry(record.session_id.clone())
            .or_insert_with(|| record.clone());
        Ok(stored.clone())
    }

    async fn find_by_token(&self, token: &str) -> RepoResult<Option<OnboardingRecord>> {
        Ok(self
            .records
            .lock()
            .values()
            .find(|r| r.onboarding_token == token)
            .cloned())
    }

    async fn complete(&self, token: &str, partner_id: &str, slug: &str) -> RepoResult<bool> {
        let mut records = self.records.lock();
        let record = records
            .values_mut()
            .find(|r| r.onboarding_token == token && r.status == OnboardingStatus::TokenIssued);
        match record {
            Some(record) => {
                record.status = OnboardingStatus::PartnerCreated;
                record.partner_id = Some(partner_id.to_string());
                record.partner_slug = Some(slug.to_string());
                record.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_portal_user(&self, token: &str, portal_user_id: &str) -> RepoResult<()> {
        let mut records = self.records.lock();
        let record = records
            .values_mut()
            .find(|r| r.onboarding_token == token)
            .ok_or(DomainError::InvalidOnboardingToken)?;
        record.portal_user_id = Some(portal_user_id.to_string());
        record.updated_at = Utc::now();
        Ok(())
    }
}

// ============================================================================
// Partner Repository
// ============================================================================

/// In-memory PartnerRepository keyed by slug
#[derive(Default)]
pub struct InMemoryPartnerRepository {
    partners: Mutex<HashMap<String, Partner>>,
}

impl InMemoryPartnerRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn count(&self) -> usize {
        self.partners.lock().len()
    }
}

#[async_trait]
impl PartnerRepository for InMemoryPartnerRepository {
    async fn create(&self, partner: &Partner) -> RepoResult<()> {
        let mut partners = self.partners.lock();
        if partners.contains_key(&partner.slug) {
            return Err(DomainError::SlugAlreadyExists(partner.slug.clone()));
        }
        partners.insert(partner.slug.clone(), partner.clone());
        Ok(())
    }

    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Partner>> {
        Ok(self.partners.lock().get(slug).cloned())
    }

    async fn slug_exists(&self, slug: &str) -> RepoResult<bool> {
        Ok(self.partners.lock().contains_key(slug))
    }
}

// ============================================================================
// Payment Repository
// ============================================================================

/// In-memory PaymentRepository keyed by session id
#[derive(Default)]
pub struct InMemoryPaymentRepository {
    payments: Mutex<HashMap<String, Payment>>,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn count(&self) -> usize {
        self.payments.lock().len()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn find_by_session(&self, session_id: &str) -> RepoResult<Option<Payment>> {
        Ok(self.payments.lock().get(session_id).cloned())
    }

    async fn upsert(&self, payment: &Payment) -> RepoResult<()> {
        self.payments
            .lock()
            .insert(payment.session_id.clone(), payment.clone());
        Ok(())
    }
}

// ============================================================================
// Rentals Repository
// ============================================================================

/// In-memory RentalsRepository
#[derive(Default)]
pub struct InMemoryRentalsRepository {
    accounts: Mutex<HashMap<String, RentalsAccount>>,
}

impl InMemoryRentalsRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn get(&self, id: &str) -> Option<RentalsAccount> {
        self.accounts.lock().get(id).cloned()
    }

    pub fn put(&self, account: RentalsAccount) {
        self.accounts.lock().insert(account.id.clone(), account);
    }
}

#[async_trait]
impl RentalsRepository for InMemoryRentalsRepository {
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<RentalsAccount>> {
        Ok(self.accounts.lock().get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<RentalsAccount>> {
        Ok(self
            .accounts
            .lock()
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn apply_subscription(
        &self,
        id: &str,
        update: &RentalsSubscriptionUpdate,
    ) -> RepoResult<()> {
        let mut accounts = self.accounts.lock();
        let account = accounts
            .get_mut(id)
            .ok_or_else(|| DomainError::DatabaseError("Rentals account not found".to_string()))?;
        if let Some(plan_tier) = &update.plan_tier {
            account.plan_tier = Some(plan_tier.clone());
        }
        if let Some(property_limit) = update.property_limit {
            account.property_limit = Some(property_limit);
        }
        if let Some(email) = &update.email {
            account.email.clone_from(email);
        }
        if let Some(customer) = &update.stripe_customer_id {
            account.stripe_customer_id = Some(customer.clone());
        }
        if let Some(subscription) = &update.stripe_subscription_id {
            account.stripe_subscription_id = Some(subscription.clone());
        }
        if let Some(status) = &update.subscription_status {
            account.subscription_status = Some(status.clone());
        }
        account.updated_at = Utc::now();
        Ok(())
    }
}

// ============================================================================
// Recording Mailer
// ============================================================================

/// Mailer that records every message instead of sending it
///
/// Can be switched into a failing mode to exercise the send-then-flag
/// ordering in the reminder dispatcher.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
    failing: Mutex<bool>,
}

impl RecordingMailer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// All recorded messages
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().clone()
    }

    /// Number of recorded messages
    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }

    /// Subjects of recorded messages, in send order
    pub fn subjects(&self) -> Vec<String> {
        self.sent.lock().iter().map(|m| m.subject.clone()).collect()
    }

    /// Recipient emails of recorded messages, in send order
    pub fn recipients(&self) -> Vec<String> {
        self.sent.lock().iter().map(|m| m.to.email.clone()).collect()
    }

    /// When failing, every send errors and nothing is recorded
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailerError> {
        if *self.failing.lock() {
            return Err(MailerError::Transport("recording mailer failing".to_string()));
        }
        self.sent.lock().push(message.clone());
        Ok(())
    }
}
