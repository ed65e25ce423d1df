//! PostgreSQL implementation of RentalsRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use setdate_core::entities::{RentalsAccount, RentalsSubscriptionUpdate};
use setdate_core::traits::{RentalsRepository, RepoResult};

use crate::models::RentalsModel;

use super::error::{map_db_error, rentals_not_found};

/// PostgreSQL implementation of RentalsRepository
#[derive(Clone)]
pub struct PgRentalsRepository {
    pool: PgPool,
}

impl PgRentalsRepository {
    /// Create a new PgRentalsRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RentalsRepository for PgRentalsRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<RentalsAccount>> {
        let result = sqlx::query_as::<_, RentalsModel>(
            r#"
            SELECT id, email, plan_tier, property_limit, stripe_customer_id,
                   stripe_subscription_id, subscription_status, created_at, updated_at
            FROM rentals_accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(RentalsAccount::from))
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<RentalsAccount>> {
        let result = sqlx::query_as::<_, RentalsModel>(
            r#"
            SELECT id, email, plan_tier, property_limit, stripe_customer_id,
                   stripe_subscription_id, subscription_status, created_at, updated_at
            FROM rentals_accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(RentalsAccount::from))
    }

    #[instrument(skip(self, update))]
    async fn apply_subscription(
        &self,
        id: &str,
        update: &RentalsSubscriptionUpdate,
    ) -> RepoResult<()> {
        // Partial merge: absent fields keep their stored values.
        let result = sqlx::query(
            r#"
            UPDATE rentals_accounts
            SET plan_tier = COALESCE($2, plan_tier),
                property_limit = COALESCE($3, property_limit),
                email = COALESCE($4, email),
                stripe_customer_id = COALESCE($5, stripe_customer_id),
                stripe_subscription_id = COALESCE($6, stripe_subscription_id),
                subscription_status = COALESCE($7, subscription_status),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&update.plan_tier)
        .bind(update.property_limit)
        .bind(&update.email)
        .bind(&update.stripe_customer_id)
        .bind(&update.stripe_subscription_id)
        .bind(&update.subscription_status)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(rentals_not_found());
        }

        Ok(())
    }
}
