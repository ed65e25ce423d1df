//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod context;
pub mod entitlement;
pub mod error;
pub mod mailer;
pub mod notification;
pub mod onboarding;
pub mod partner;
pub mod poll;
pub mod reminder;
pub mod webhook;

// Re-export all services for convenience
pub use context::{ServiceContext, ServiceContextBuilder};
pub use entitlement::EntitlementService;
pub use error::{ServiceError, ServiceResult};
pub use mailer::{BrevoMailer, EmailMessage, EmailRecipient, Mailer, MailerError};
pub use notification::NotificationService;
pub use onboarding::OnboardingService;
pub use partner::PartnerService;
pub use poll::PollService;
pub use reminder::ReminderService;
pub use webhook::WebhookService;
