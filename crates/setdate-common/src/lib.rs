//! # setdate-common
//!
//! Shared utilities including configuration, error handling, portal
//! credentials, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{PortalClaims, PortalTokenService};
pub use config::{
    AdminConfig, AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment,
    GatingConfig, JwtConfig, MailConfig, ReminderConfig, ServerConfig, StripeConfig, TasksConfig,
};
pub use error::{AppError, AppResult};
pub use telemetry::{init_tracing, try_init_tracing, TracingConfig, TracingError};
