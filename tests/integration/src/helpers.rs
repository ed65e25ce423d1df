//! Test harness wiring the in-memory fixtures into a ServiceContext

use std::sync::Arc;

use setdate_common::auth::PortalTokenService;
use setdate_common::config::{
    AdminConfig, AppConfig, AppSettings, CorsConfig, DatabaseConfig, Environment, GatingConfig,
    JwtConfig, MailConfig, ReminderConfig, ServerConfig, StripeConfig, TasksConfig,
};
use setdate_service::{ServiceContext, ServiceContextBuilder};

use crate::fixtures::{
    InMemoryOnboardingRepository, InMemoryOrganiserRepository, InMemoryPartnerRepository,
    InMemoryPaymentRepository, InMemoryPollRepository, InMemoryRentalsRepository,
    InMemoryVoteRepository, RecordingMailer,
};

/// A configuration suitable for in-memory tests
#[must_use]
pub fn test_config() -> AppConfig {
    AppConfig {
        app: AppSettings {
            name: "setdate".to_string(),
            env: Environment::Development,
            base_url: "http://localhost:3000".to_string(),
            organiser_id_salt: "test-salt".to_string(),
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "postgresql://unused".to_string(),
            max_connections: 1,
            min_connections: 1,
            acquire_timeout_secs: 1,
        },
        jwt: JwtConfig {
            secret: "test-secret-for-tests-only".to_string(),
            portal_token_expiry: 3600,
        },
        mail: MailConfig {
            api_key: "test-api-key".to_string(),
            api_base: "http://localhost:9999".to_string(),
            sender_name: "Set The Date".to_string(),
            sender_email: "hello@example.com".to_string(),
            reply_to_email: None,
            timeout_secs: 1,
        },
        stripe: StripeConfig {
            secret_key: "sk_test_unused".to_string(),
            webhook_secret: "whsec_test".to_string(),
            api_base: "http://localhost:9999".to_string(),
            signature_tolerance_secs: 300,
        },
        gating: GatingConfig::default(),
        reminders: ReminderConfig::default(),
        admin: AdminConfig::default(),
        tasks: TasksConfig {
            key: "test-task-key".to_string(),
        },
        cors: CorsConfig::default(),
    }
}

/// All fixtures plus the wired service context
pub struct TestHarness {
    pub ctx: ServiceContext,
    pub polls: Arc<InMemoryPollRepository>,
    pub votes: Arc<InMemoryVoteRepository>,
    pub organisers: Arc<InMemoryOrganiserRepository>,
    pub onboarding: Arc<InMemoryOnboardingRepository>,
    pub partners: Arc<InMemoryPartnerRepository>,
    pub payments: Arc<InMemoryPaymentRepository>,
    pub rentals: Arc<InMemoryRentalsRepository>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestHarness {
    /// Build a harness with the default test configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Build a harness with a custom configuration
    ///
    /// # Panics
    /// Panics if the service context cannot be built; a test setup
    /// failure, not a runtime condition.
    #[must_use]
    pub fn with_config(config: AppConfig) -> Self {
        let polls = InMemoryPollRepository::new();
        let votes = InMemoryVoteRepository::new();
        let organisers = InMemoryOrganiserRepository::new();
        let onboarding = InMemoryOnboardingRepository::new();
        let partners = InMemoryPartnerRepository::new();
        let payments = InMemoryPaymentRepository::new();
        let rentals = InMemoryRentalsRepository::new();
        let mailer = RecordingMailer::new();

        let portal_tokens = Arc::new(PortalTokenService::new(
            &config.jwt.secret,
            config.jwt.portal_token_expiry,
        ));

        let ctx = ServiceContextBuilder::new()
            .poll_repo(polls.clone())
            .vote_repo(votes.clone())
            .organiser_repo(organisers.clone())
            .onboarding_repo(onboarding.clone())
            .partner_repo(partners.clone())
            .payment_repo(payments.clone())
            .rentals_repo(rentals.clone())
            .mailer(mailer.clone())
            .portal_tokens(portal_tokens)
            .config(Arc::new(config))
            .build()
            .expect("test service context");

        Self {
            ctx,
            polls,
            votes,
            organisers,
            onboarding,
            partners,
            payments,
            rentals,
            mailer,
        }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
