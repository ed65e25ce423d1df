//! Service context - dependency container for services
//!
//! Holds all repositories, the mailer, the portal-token service, and the
//! application configuration needed by services.

use std::sync::Arc;

use setdate_common::auth::PortalTokenService;
use setdate_common::config::AppConfig;
use setdate_core::traits::{
    OnboardingRepository, OrganiserRepository, PartnerRepository, PaymentRepository,
    PollRepository, RentalsRepository, VoteRepository,
};

use super::mailer::Mailer;

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Repositories (trait objects, so tests can run in-memory)
/// - The outbound mailer
/// - The portal-token service for venue credentials
/// - Application configuration
#[derive(Clone)]
pub struct ServiceContext {
    poll_repo: Arc<dyn PollRepository>,
    vote_repo: Arc<dyn VoteRepository>,
    organiser_repo: Arc<dyn OrganiserRepository>,
    onboarding_repo: Arc<dyn OnboardingRepository>,
    partner_repo: Arc<dyn PartnerRepository>,
    payment_repo: Arc<dyn PaymentRepository>,
    rentals_repo: Arc<dyn RentalsRepository>,
    mailer: Arc<dyn Mailer>,
    portal_tokens: Arc<PortalTokenService>,
    config: Arc<AppConfig>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        poll_repo: Arc<dyn PollRepository>,
        vote_repo: Arc<dyn VoteRepository>,
        organiser_repo: Arc<dyn OrganiserRepository>,
        onboarding_repo: Arc<dyn OnboardingRepository>,
        partner_repo: Arc<dyn PartnerRepository>,
        payment_repo: Arc<dyn PaymentRepository>,
        rentals_repo: Arc<dyn RentalsRepository>,
        mailer: Arc<dyn Mailer>,
        portal_tokens: Arc<PortalTokenService>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            poll_repo,
            vote_repo,
            organiser_repo,
            onboarding_repo,
            partner_repo,
            payment_repo,
            rentals_repo,
            mailer,
            portal_tokens,
            config,
        }
    }

    // === Repositories ===

    /// Get the poll repository
    pub fn poll_repo(&self) -> &dyn PollRepository {
        self.poll_repo.as_ref()
    }

    /// Get the vote repository
    pub fn vote_repo(&self) -> &dyn VoteRepository {
        self.vote_repo.as_ref()
    }

    /// Get the organiser repository
    pub fn organiser_repo(&self) -> &dyn OrganiserRepository {
        self.organiser_repo.as_ref()
    }

    /// Get the onboarding repository
    pub fn onboarding_repo(&self) -> &dyn OnboardingRepository {
        self.onboarding_repo.as_ref()
    }

    /// Get the partner repository
    pub fn partner_repo(&self) -> &dyn PartnerRepository {
        self.partner_repo.as_ref()
    }

    /// Get the payment repository
    pub fn payment_repo(&self) -> &dyn PaymentRepository {
        self.payment_repo.as_ref()
    }

    /// Get the rentals repository
    pub fn rentals_repo(&self) -> &dyn RentalsRepository {
        self.rentals_repo.as_ref()
    }

    // === Collaborators ===

    /// Get the mailer
    pub fn mailer(&self) -> &dyn Mailer {
        self.mailer.as_ref()
    }

    /// Get the portal-token service
    pub fn portal_tokens(&self) -> &PortalTokenService {
        self.portal_tokens.as_ref()
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        self.config.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("mailer", &"...")
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    poll_repo: Option<Arc<dyn PollRepository>>,
    vote_repo: Option<Arc<dyn VoteRepository>>,
    organiser_repo: Option<Arc<dyn OrganiserRepository>>,
    onboarding_repo: Option<Arc<dyn OnboardingRepository>>,
    partner_repo: Option<Arc<dyn PartnerRepository>>,
    payment_repo: Option<Arc<dyn PaymentRepository>>,
    rentals_repo: Option<Arc<dyn RentalsRepository>>,
    mailer: Option<Arc<dyn Mailer>>,
    portal_tokens: Option<Arc<PortalTokenService>>,
    config: Option<Arc<AppConfig>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll_repo(mut self, repo: Arc<dyn PollRepository>) -> Self {
        self.poll_repo = Some(repo);
        self
    }

    pub fn vote_repo(mut self, repo: Arc<dyn VoteRepository>) -> Self {
        self.vote_repo = Some(repo);
        self
    }

    pub fn organiser_repo(mut self, repo: Arc<dyn OrganiserRepository>) -> Self {
        self.organiser_repo = Some(repo);
        self
    }

    pub fn onboarding_repo(mut self, repo: Arc<dyn OnboardingRepository>) -> Self {
        self.onboarding_repo = Some(repo);
        self
    }

    pub fn partner_repo(mut self, repo: Arc<dyn PartnerRepository>) -> Self {
        self.partner_repo = Some(repo);
        self
    }

    pub fn payment_repo(mut self, repo: Arc<dyn PaymentRepository>) -> Self {
        self.payment_repo = Some(repo);
        self
    }

    pub fn rentals_repo(mut self, repo: Arc<dyn RentalsRepository>) -> Self {
        self.rentals_repo = Some(repo);
        self
    }

    pub fn mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    pub fn portal_tokens(mut self, service: Arc<PortalTokenService>) -> Self {
        self.portal_tokens = Some(service);
        self
    }

    pub fn config(mut self, config: Arc<AppConfig>) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        use super::error::ServiceError;
        Ok(ServiceContext::new(
            self.poll_repo
                .ok_or_else(|| ServiceError::validation("poll_repo is required"))?,
            self.vote_repo
                .ok_or_else(|| ServiceError::validation("vote_repo is required"))?,
            self.organiser_repo
                .ok_or_else(|| ServiceError::validation("organiser_repo is required"))?,
            self.onboarding_repo
                .ok_or_else(|| ServiceError::validation("onboarding_repo is required"))?,
            self.partner_repo
                .ok_or_else(|| ServiceError::validation("partner_repo is required"))?,
            self.payment_repo
                .ok_or_else(|| ServiceError::validation("payment_repo is required"))?,
            self.rentals_repo
                .ok_or_else(|| ServiceError::validation("rentals_repo is required"))?,
            self.mailer
                .ok_or_else(|| ServiceError::validation("mailer is required"))?,
            self.portal_tokens
                .ok_or_else(|| ServiceError::validation("portal_tokens is required"))?,
            self.config
                .ok_or_else(|| ServiceError::validation("config is required"))?,
        ))
    }
}
