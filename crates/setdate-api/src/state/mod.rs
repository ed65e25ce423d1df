//! Application state
//!
//! Holds the shared state for the Axum application: the service context,
//! configuration, the database pool (for readiness probes), and the
//! payment-processor client used at the HTTP boundary.

use std::sync::Arc;

use setdate_common::AppConfig;
use setdate_db::PgPool;
use setdate_service::ServiceContext;

use crate::stripe::StripeClient;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Service context containing all dependencies
    service_context: Arc<ServiceContext>,
    /// Application configuration
    config: Arc<AppConfig>,
    /// Database pool, held separately for health checks
    pool: PgPool,
    /// Payment processor API client
    stripe: Arc<StripeClient>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(
        service_context: ServiceContext,
        config: AppConfig,
        pool: PgPool,
        stripe: StripeClient,
    ) -> Self {
        Self {
            service_context: Arc::new(service_context),
            config: Arc::new(config),
            pool,
            stripe: Arc::new(stripe),
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the database pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get the payment processor client
    pub fn stripe(&self) -> &StripeClient {
        &self.stripe
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &"ServiceContext")
            .field("config", &"AppConfig")
            .finish()
    }
}
