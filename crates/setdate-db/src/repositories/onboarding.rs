//! PostgreSQL implementation of OnboardingRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use setdate_core::entities::OnboardingRecord;
use setdate_core::error::DomainError;
use setdate_core::traits::{OnboardingRepository, RepoResult};

use crate::models::OnboardingModel;

use super::error::{map_db_error, onboarding_not_found};

/// PostgreSQL implementation of OnboardingRepository
///
/// `complete` is the one-time claim: a guarded UPDATE from `token_issued`
/// that at most one concurrent caller wins.
#[derive(Clone)]
pub struct PgOnboardingRepository {
    pool: PgPool,
}

impl PgOnboardingRepository {
    /// Create a new PgOnboardingRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OnboardingRepository for PgOnboardingRepository {
    #[instrument(skip(self))]
    async fn find_by_session(&self, session_id: &str) -> RepoResult<Option<OnboardingRecord>> {
        let result = sqlx::query_as::<_, OnboardingModel>(
            r#"
            SELECT session_id, stripe_customer_id, customer_email, customer_name,
                   onboarding_token, status, partner_id, partner_slug, portal_user_id,
                   created_at, updated_at
            FROM onboarding_sessions
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(OnboardingRecord::from))
    }

    #[instrument(skip(self, record), fields(session_id = %record.session_id))]
    async fn create_if_absent(&self, record: &OnboardingRecord) -> RepoResult<OnboardingRecord> {
        // Replay-safe create: a redelivered webhook must get back the
        // original record with its original token, not a fresh one.
        sqlx::query(
            r#"
            INSERT INTO onboarding_sessions (session_id, stripe_customer_id, customer_email,
                                             customer_name, onboarding_token, status,
                                             partner_id, partner_slug, portal_user_id,
                                             created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (session_id) DO NOTHING
            "#,
        )
        .bind(&record.session_id)
        .bind(&record.stripe_customer_id)
        .bind(&record.customer_email)
        .bind(&record.customer_name)
        .bind(&record.onboarding_token)
        .bind(record.status.as_str())
        .bind(&record.partner_id)
        .bind(&record.partner_slug)
        .bind(&record.portal_user_id)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        self.find_by_session(&record.session_id)
            .await?
            .ok_or_else(|| onboarding_not_found(&record.session_id))
    }

    #[instrument(skip(self, token))]
    async fn find_by_token(&self, token: &str) -> RepoResult<Option<OnboardingRecord>> {
        let result = sqlx::query_as::<_, OnboardingModel>(
            r#"
            SELECT session_id, stripe_customer_id, customer_email, customer_name,
                   onboarding_token, status, partner_id, partner_slug, portal_user_id,
                   created_at, updated_at
            FROM onboarding_sessions
            WHERE onboarding_token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(OnboardingRecord::from))
    }

    #[instrument(skip(self, token))]
    async fn complete(&self, token: &str, partner_id: &str, slug: &str) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE onboarding_sessions
            SET status = 'partner_created',
                partner_id = $2,
                partner_slug = $3,
                updated_at = NOW()
            WHERE onboarding_token = $1 AND status = 'token_issued'
            "#,
        )
        .bind(token)
        .bind(partner_id)
        .bind(slug)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, token))]
    async fn set_portal_user(&self, token: &str, portal_user_id: &str) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE onboarding_sessions
            SET portal_user_id = $2, updated_at = NOW()
            WHERE onboarding_token = $1
            "#,
        )
        .bind(token)
        .bind(portal_user_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::InvalidOnboardingToken);
        }

        Ok(())
    }
}
