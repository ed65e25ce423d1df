//! # setdate-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

pub use services::{
    BrevoMailer, EmailMessage, EmailRecipient, EntitlementService, Mailer, MailerError,
    NotificationService, OnboardingService, PartnerService, PollService, ReminderService,
    ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult, WebhookService,
};
