//! Mailer abstraction and the Brevo HTTP implementation
//!
//! All notification sends go through the [`Mailer`] trait so tests can
//! substitute a recording implementation. The production implementation
//! talks to the Brevo transactional API over HTTPS with a bounded
//! timeout and a single retry for transient failures.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use tracing::{instrument, warn};

use setdate_common::config::MailConfig;

/// A single recipient
#[derive(Debug, Clone, Serialize)]
pub struct EmailRecipient {
    pub email: String,
    pub name: String,
}

/// An outbound transactional email
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: EmailRecipient,
    pub subject: String,
    pub html_body: String,
    pub reply_to: Option<String>,
}

/// Mailer errors
#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    /// Transport-level failure (connect, timeout)
    #[error("Email transport error: {0}")]
    Transport(String),

    /// The API rejected the request
    #[error("Email API error (status {status}): {body}")]
    Api { status: u16, body: String },
}

impl MailerError {
    /// Whether a retry with backoff could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Api { status, .. } => *status >= 500 || *status == 429,
        }
    }
}

/// Outbound email port
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send one message. Delivery is best-effort; the API response is the
    /// only confirmation.
    async fn send(&self, message: &EmailMessage) -> Result<(), MailerError>;
}

/// Brevo transactional email client
///
/// Retries once on a retryable failure (two attempts total), then gives
/// up — callers treat send failures as logged warnings, so an unbounded
/// retry here would just stall the calling operation.
pub struct BrevoMailer {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    sender_name: String,
    sender_email: String,
    reply_to_email: Option<String>,
}

const SEND_ATTEMPTS: u32 = 2;

impl BrevoMailer {
    /// Create a mailer from configuration
    pub fn new(config: &MailConfig) -> Result<Self, MailerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MailerError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            api_key: config.api_key.clone(),
            sender_name: config.sender_name.clone(),
            sender_email: config.sender_email.clone(),
            reply_to_email: config.reply_to_email.clone(),
        })
    }

    async fn send_once(&self, message: &EmailMessage) -> Result<(), MailerError> {
        let mut body = json!({
            "sender": {"name": self.sender_name, "email": self.sender_email},
            "to": [{"email": message.to.email, "name": message.to.name}],
            "subject": message.subject,
            "htmlContent": message.html_body,
        });

        let reply_to = message.reply_to.as_ref().or(self.reply_to_email.as_ref());
        if let Some(reply_to) = reply_to {
            body["replyTo"] = json!({"email": reply_to});
        }

        let response = self
            .client
            .post(format!("{}/smtp/email", self.api_base))
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| MailerError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(MailerError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Mailer for BrevoMailer {
    #[instrument(skip(self, message), fields(to = %message.to.email, subject = %message.subject))]
    async fn send(&self, message: &EmailMessage) -> Result<(), MailerError> {
        let mut last_err = None;
        for attempt in 1..=SEND_ATTEMPTS {
            match self.send_once(message).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_retryable() && attempt < SEND_ATTEMPTS => {
                    warn!(attempt, error = %e, "Email send failed, retrying");
                    last_err = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        // Unreachable in practice: the loop either returned or stored an
        // error on the last retryable attempt.
        Err(last_err.unwrap_or_else(|| MailerError::Transport("send failed".to_string())))
    }
}
