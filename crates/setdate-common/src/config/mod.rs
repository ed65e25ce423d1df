//! Configuration

mod app_config;

pub use app_config::{
    AdminConfig, AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment,
    GatingConfig, JwtConfig, MailConfig, ReminderConfig, ServerConfig, StripeConfig, TasksConfig,
};
