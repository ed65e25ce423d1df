//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use setdate_common::{AppConfig, AppError, PortalTokenService};
use setdate_db::{
    create_pool, PgOnboardingRepository, PgOrganiserRepository, PgPartnerRepository,
    PgPaymentRepository, PgPollRepository, PgRentalsRepository, PgVoteRepository,
};
use setdate_service::{BrevoMailer, ServiceContextBuilder};
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::apply_middleware;
use crate::routes::create_router;
use crate::state::AppState;
use crate::stripe::StripeClient;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let router = create_router();
    let router = apply_middleware(
        router,
        &state.config().cors,
        state.config().app.env.is_production(),
    );
    router.with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    // Create database pool
    info!("Connecting to PostgreSQL...");
    let db_config = setdate_db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        acquire_timeout: std::time::Duration::from_secs(config.database.acquire_timeout_secs),
        ..Default::default()
    };
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    // Create the transactional mailer
    let mailer = Arc::new(
        BrevoMailer::new(&config.mail)
            .map_err(|e| AppError::ExternalService(e.to_string()))?,
    );

    // Create the portal credential issuer
    let portal_tokens = Arc::new(PortalTokenService::new(
        &config.jwt.secret,
        config.jwt.portal_token_expiry,
    ));

    // Create the payment processor client
    let stripe = StripeClient::new(&config.stripe)?;

    // Create repositories
    let poll_repo = Arc::new(PgPollRepository::new(pool.clone()));
    let vote_repo = Arc::new(PgVoteRepository::new(pool.clone()));
    let organiser_repo = Arc::new(PgOrganiserRepository::new(pool.clone()));
    let onboarding_repo = Arc::new(PgOnboardingRepository::new(pool.clone()));
    let partner_repo = Arc::new(PgPartnerRepository::new(pool.clone()));
    let payment_repo = Arc::new(PgPaymentRepository::new(pool.clone()));
    let rentals_repo = Arc::new(PgRentalsRepository::new(pool.clone()));

    // Build service context
    let service_context = ServiceContextBuilder::new()
        .poll_repo(poll_repo)
        .vote_repo(vote_repo)
        .organiser_repo(organiser_repo)
        .onboarding_repo(onboarding_repo)
        .partner_repo(partner_repo)
        .payment_repo(payment_repo)
        .rentals_repo(rentals_repo)
        .mailer(mailer)
        .portal_tokens(portal_tokens)
        .config(Arc::new(config.clone()))
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config, pool, stripe))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {}", e)))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .server
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid server address: {e}")))?;

    // Create app state
    let state = create_app_state(config).await?;

    // Build application
    let app = create_app(state);

    // Run server
    run_server(app, addr).await
}
