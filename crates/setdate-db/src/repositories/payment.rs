//! PostgreSQL implementation of PaymentRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use setdate_core::entities::Payment;
use setdate_core::traits::{PaymentRepository, RepoResult};

use crate::models::PaymentModel;

use super::error::map_db_error;

/// PostgreSQL implementation of PaymentRepository
#[derive(Clone)]
pub struct PgPaymentRepository {
    pool: PgPool,
}

impl PgPaymentRepository {
    /// Create a new PgPaymentRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepository for PgPaymentRepository {
    #[instrument(skip(self))]
    async fn find_by_session(&self, session_id: &str) -> RepoResult<Option<Payment>> {
        let result = sqlx::query_as::<_, PaymentModel>(
            r#"
            SELECT session_id, organiser_id, email, amount_total, currency,
                   price_id, created_at, updated_at
            FROM payments
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Payment::from))
    }

    #[instrument(skip(self, payment), fields(session_id = %payment.session_id))]
    async fn upsert(&self, payment: &Payment) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO payments (session_id, organiser_id, email, amount_total,
                                  currency, price_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (session_id) DO UPDATE
            SET organiser_id = EXCLUDED.organiser_id,
                email = EXCLUDED.email,
                amount_total = EXCLUDED.amount_total,
                currency = EXCLUDED.currency,
                price_id = EXCLUDED.price_id,
                updated_at = NOW()
            "#,
        )
        .bind(&payment.session_id)
        .bind(&payment.organiser_id)
        .bind(&payment.email)
        .bind(payment.amount_total)
        .bind(&payment.currency)
        .bind(&payment.price_id)
        .bind(payment.created_at)
        .bind(payment.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
