//! PostgreSQL implementation of OrganiserRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use setdate_core::entities::Organiser;
use setdate_core::traits::{OrganiserRepository, RepoResult};

use crate::models::OrganiserModel;

use super::error::map_db_error;

/// PostgreSQL implementation of OrganiserRepository
///
/// The counter and plan transitions are single upsert statements so that
/// concurrent webhook deliveries and poll creations collapse correctly on
/// the hashed identity key.
#[derive(Clone)]
pub struct PgOrganiserRepository {
    pool: PgPool,
}

impl PgOrganiserRepository {
    /// Create a new PgOrganiserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrganiserRepository for PgOrganiserRepository {
    #[instrument(skip(self))]
    async fn find(&self, id: &str) -> RepoResult<Option<Organiser>> {
        let result = sqlx::query_as::<_, OrganiserModel>(
            r#"
            SELECT id, email, plan_type, polls_created_count, stripe_customer_id,
                   last_stripe_session_id, last_upgrade_at, created_at, updated_at
            FROM organisers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Organiser::from))
    }

    #[instrument(skip(self, organiser), fields(organiser_id = %organiser.id))]
    async fn ensure(&self, organiser: &Organiser) -> RepoResult<Organiser> {
        // The no-op DO UPDATE makes RETURNING yield the stored row on
        // conflict, so concurrent first-touch callers all see one record.
        let model = sqlx::query_as::<_, OrganiserModel>(
            r#"
            INSERT INTO organisers (id, email, plan_type, polls_created_count,
                                    stripe_customer_id, last_stripe_session_id,
                                    last_upgrade_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET id = organisers.id
            RETURNING id, email, plan_type, polls_created_count, stripe_customer_id,
                      last_stripe_session_id, last_upgrade_at, created_at, updated_at
            "#,
        )
        .bind(&organiser.id)
        .bind(&organiser.email)
        .bind(organiser.plan_type.as_str())
        .bind(organiser.polls_created_count)
        .bind(&organiser.stripe_customer_id)
        .bind(&organiser.last_stripe_session_id)
        .bind(organiser.last_upgrade_at)
        .bind(organiser.created_at)
        .bind(organiser.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Organiser::from(model))
    }

    #[instrument(skip(self))]
    async fn increment_polls_created(&self, id: &str, email: &str) -> RepoResult<Organiser> {
        let model = sqlx::query_as::<_, OrganiserModel>(
            r#"
            INSERT INTO organisers (id, email, plan_type, polls_created_count,
                                    created_at, updated_at)
            VALUES ($1, $2, 'free', 1, NOW(), NOW())
            ON CONFLICT (id) DO UPDATE
            SET polls_created_count = organisers.polls_created_count + 1,
                updated_at = NOW()
            RETURNING id, email, plan_type, polls_created_count, stripe_customer_id,
                      last_stripe_session_id, last_upgrade_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Organiser::from(model))
    }

    #[instrument(skip(self))]
    async fn mark_upgraded(
        &self,
        id: &str,
        email: &str,
        stripe_customer_id: Option<&str>,
        session_id: &str,
    ) -> RepoResult<Organiser> {
        let model = sqlx::query_as::<_, OrganiserModel>(
            r#"
            INSERT INTO organisers (id, email, plan_type, polls_created_count,
                                    stripe_customer_id, last_stripe_session_id,
                                    last_upgrade_at, created_at, updated_at)
            VALUES ($1, $2, 'pro', 0, $3, $4, NOW(), NOW(), NOW())
            ON CONFLICT (id) DO UPDATE
            SET plan_type = 'pro',
                stripe_customer_id = COALESCE($3, organisers.stripe_customer_id),
                last_stripe_session_id = $4,
                last_upgrade_at = NOW(),
                updated_at = NOW()
            RETURNING id, email, plan_type, polls_created_count, stripe_customer_id,
                      last_stripe_session_id, last_upgrade_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(stripe_customer_id)
        .bind(session_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Organiser::from(model))
    }
}
