//! Application configuration structs
//!
//! Loads configuration from environment variables (with `.env` support).

use serde::Deserialize;
use std::env;

use setdate_core::normalise_email;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub mail: MailConfig,
    pub stripe: StripeConfig,
    pub gating: GatingConfig,
    pub reminders: ReminderConfig,
    pub admin: AdminConfig,
    pub tasks: TasksConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
    /// Public base URL used in links embedded in emails.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Salt for deriving organiser identity keys from emails. Changing it
    /// orphans existing organiser records.
    pub organiser_id_salt: String,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

/// JWT configuration for portal credentials
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    /// Lifetime of minted portal tokens, in seconds.
    #[serde(default = "default_portal_token_expiry")]
    pub portal_token_expiry: i64,
}

/// Transactional email configuration (Brevo-compatible HTTP API)
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    pub api_key: String,
    #[serde(default = "default_mail_api_base")]
    pub api_base: String,
    #[serde(default = "default_sender_name")]
    pub sender_name: String,
    pub sender_email: String,
    pub reply_to_email: Option<String>,
    #[serde(default = "default_mail_timeout_secs")]
    pub timeout_secs: u64,
}

/// Payment processor configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StripeConfig {
    /// Secret API key, used to look up checkout sessions.
    pub secret_key: String,
    pub webhook_secret: String,
    #[serde(default = "default_stripe_api_base")]
    pub api_base: String,
    /// Allowed clock skew for webhook signature timestamps, in seconds.
    #[serde(default = "default_signature_tolerance_secs")]
    pub signature_tolerance_secs: i64,
}

/// Free-plan gating limits. The entitlement store only tracks counters;
/// the numeric bounds live here.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GatingConfig {
    #[serde(default = "default_free_poll_limit")]
    pub free_poll_limit: i64,
    #[serde(default = "default_free_date_limit")]
    pub free_date_limit: usize,
}

/// Reminder sweep thresholds
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ReminderConfig {
    /// Deadline lookahead window for the closing-soon notice, in hours.
    #[serde(default = "default_closing_soon_lookahead_hours")]
    pub closing_soon_lookahead_hours: i64,
    /// Closing-soon notices are suppressed at or above this many
    /// non-organiser votes.
    #[serde(default = "default_closing_soon_vote_threshold")]
    pub closing_soon_vote_threshold: i64,
    /// Low-votes nudges only fire for polls at least this old, in hours.
    #[serde(default = "default_low_votes_min_age_hours")]
    pub low_votes_min_age_hours: i64,
    /// ...and no older than this, in hours.
    #[serde(default = "default_low_votes_max_age_hours")]
    pub low_votes_max_age_hours: i64,
    /// Cap on low-votes nudges per poll.
    #[serde(default = "default_low_votes_max_reminders")]
    pub low_votes_max_reminders: i32,
    /// Minimum spacing between low-votes nudges, in hours.
    #[serde(default = "default_low_votes_spacing_hours")]
    pub low_votes_spacing_hours: i64,
}

/// Injected admin allow-list; replaces any process-wide mutable state.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminConfig {
    pub emails: Vec<String>,
}

impl AdminConfig {
    /// Pure capability check over the normalised allow-list.
    #[must_use]
    pub fn is_admin(&self, email: &str) -> bool {
        let normalised = normalise_email(email);
        if normalised.is_empty() {
            return false;
        }
        self.emails.iter().any(|e| normalise_email(e) == normalised)
    }
}

/// Shared-key protection for scheduler-triggered task endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct TasksConfig {
    pub key: String,
}

/// CORS configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "setdate".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

fn default_portal_token_expiry() -> i64 {
    3600 // 1 hour
}

fn default_mail_api_base() -> String {
    "https://api.brevo.com/v3".to_string()
}

fn default_sender_name() -> String {
    "Set The Date".to_string()
}

fn default_mail_timeout_secs() -> u64 {
    10
}

fn default_stripe_api_base() -> String {
    "https://api.stripe.com/v1".to_string()
}

fn default_signature_tolerance_secs() -> i64 {
    300 // 5 minutes
}

fn default_free_poll_limit() -> i64 {
    1
}

fn default_free_date_limit() -> usize {
    5
}

fn default_closing_soon_lookahead_hours() -> i64 {
    24
}

fn default_closing_soon_vote_threshold() -> i64 {
    3
}

fn default_low_votes_min_age_hours() -> i64 {
    24
}

fn default_low_votes_max_age_hours() -> i64 {
    120
}

fn default_low_votes_max_reminders() -> i32 {
    2
}

fn default_low_votes_spacing_hours() -> i64 {
    48
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
                base_url: env::var("BASE_URL").unwrap_or_else(|_| default_base_url()),
                organiser_id_salt: env::var("ORGANISER_ID_SALT")
                    .map_err(|_| ConfigError::MissingVar("ORGANISER_ID_SALT"))?,
            },
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| default_host()),
                port: env::var("SERVER_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or(ConfigError::MissingVar("SERVER_PORT"))?,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_max_connections),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_min_connections),
                acquire_timeout_secs: env::var("DATABASE_ACQUIRE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_acquire_timeout_secs),
            },
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?,
                portal_token_expiry: env::var("JWT_PORTAL_TOKEN_EXPIRY")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_portal_token_expiry),
            },
            mail: MailConfig {
                api_key: env::var("BREVO_API_KEY")
                    .map_err(|_| ConfigError::MissingVar("BREVO_API_KEY"))?,
                api_base: env::var("BREVO_API_BASE").unwrap_or_else(|_| default_mail_api_base()),
                sender_name: env::var("MAIL_SENDER_NAME")
                    .unwrap_or_else(|_| default_sender_name()),
                sender_email: env::var("MAIL_SENDER_EMAIL")
                    .map_err(|_| ConfigError::MissingVar("MAIL_SENDER_EMAIL"))?,
                reply_to_email: env::var("MAIL_REPLY_TO_EMAIL").ok(),
                timeout_secs: env::var("MAIL_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_mail_timeout_secs),
            },
            stripe: StripeConfig {
                secret_key: env::var("STRIPE_SECRET_KEY")
                    .map_err(|_| ConfigError::MissingVar("STRIPE_SECRET_KEY"))?,
                webhook_secret: env::var("STRIPE_WEBHOOK_SECRET")
                    .map_err(|_| ConfigError::MissingVar("STRIPE_WEBHOOK_SECRET"))?,
                api_base: env::var("STRIPE_API_BASE").unwrap_or_else(|_| default_stripe_api_base()),
                signature_tolerance_secs: env::var("STRIPE_SIGNATURE_TOLERANCE_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_signature_tolerance_secs),
            },
            gating: GatingConfig {
                free_poll_limit: env::var("FREE_POLL_LIMIT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_free_poll_limit),
                free_date_limit: env::var("FREE_DATE_LIMIT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_free_date_limit),
            },
            reminders: ReminderConfig::from_env(),
            admin: AdminConfig {
                emails: env::var("ADMIN_EMAILS")
                    .ok()
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            tasks: TasksConfig {
                key: env::var("TASKS_KEY").map_err(|_| ConfigError::MissingVar("TASKS_KEY"))?,
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .ok()
                    .map(|s| s.split(',').map(str::trim).map(String::from).collect())
                    .unwrap_or_default(),
            },
        })
    }
}

impl ReminderConfig {
    fn from_env() -> Self {
        Self {
            closing_soon_lookahead_hours: env::var("REMINDER_CLOSING_SOON_LOOKAHEAD_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_closing_soon_lookahead_hours),
            closing_soon_vote_threshold: env::var("REMINDER_CLOSING_SOON_VOTE_THRESHOLD")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_closing_soon_vote_threshold),
            low_votes_min_age_hours: env::var("REMINDER_LOW_VOTES_MIN_AGE_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_low_votes_min_age_hours),
            low_votes_max_age_hours: env::var("REMINDER_LOW_VOTES_MAX_AGE_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_low_votes_max_age_hours),
            low_votes_max_reminders: env::var("REMINDER_LOW_VOTES_MAX")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_low_votes_max_reminders),
            low_votes_spacing_hours: env::var("REMINDER_LOW_VOTES_SPACING_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_low_votes_spacing_hours),
        }
    }
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            closing_soon_lookahead_hours: default_closing_soon_lookahead_hours(),
            closing_soon_vote_threshold: default_closing_soon_vote_threshold(),
            low_votes_min_age_hours: default_low_votes_min_age_hours(),
            low_votes_max_age_hours: default_low_votes_max_age_hours(),
            low_votes_max_reminders: default_low_votes_max_reminders(),
            low_votes_spacing_hours: default_low_votes_spacing_hours(),
        }
    }
}

impl Default for GatingConfig {
    fn default() -> Self {
        Self {
            free_poll_limit: default_free_poll_limit(),
            free_date_limit: default_free_date_limit(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
