//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{health, organisers, partners, polls, tasks, webhooks};
use crate::state::AppState;

/// Create the main API router with all routes
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(health_routes())
        .nest("/api/v1", api_v1_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(poll_routes())
        .merge(organiser_routes())
        .merge(partner_routes())
        .merge(webhook_routes())
        .merge(task_routes())
}

/// Poll lifecycle routes
fn poll_routes() -> Router<AppState> {
    Router::new()
        .route("/polls", post(polls::create_poll))
        .route("/polls/:poll_id", get(polls::get_poll))
        .route("/polls/:poll_id/votes", post(polls::record_vote))
        .route("/polls/:poll_id/finalize", post(polls::finalize_poll))
        .route("/polls/:poll_id/cancel", post(polls::cancel_poll))
        .route("/polls/:poll_id/deadline", post(polls::extend_deadline))
        .route("/polls/:poll_id/results", get(polls::get_results))
}

/// Organiser entitlement routes
fn organiser_routes() -> Router<AppState> {
    Router::new()
        .route("/organisers/status", post(organisers::get_status))
        .route("/organisers/polls-created", post(organisers::record_poll_created))
}

/// Partner onboarding and venue routes
fn partner_routes() -> Router<AppState> {
    Router::new()
        .route("/partners", post(partners::create_partner))
        .route("/partners/onboarding", get(partners::get_onboarding))
        .route("/partners/claim-access", post(partners::claim_access))
        .route("/partners/:slug", get(partners::get_partner))
}

/// Payment processor webhook routes
fn webhook_routes() -> Router<AppState> {
    Router::new().route("/webhooks/stripe", post(webhooks::stripe_webhook))
}

/// Scheduler-triggered task routes
fn task_routes() -> Router<AppState> {
    Router::new().route("/tasks/reminder-sweep", post(tasks::reminder_sweep))
}
