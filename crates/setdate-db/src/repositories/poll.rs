//! PostgreSQL implementation of PollRepository

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use tracing::instrument;

use setdate_core::entities::Poll;
use setdate_core::traits::{PollRepository, RepoResult};

use crate::models::PollModel;

use super::error::{map_db_error, poll_not_found};

/// PostgreSQL implementation of PollRepository
///
/// Terminal-state transitions and dispatch-flag flips are guarded
/// `UPDATE ... WHERE` statements; `rows_affected` reports whether the
/// precondition still held.
#[derive(Clone)]
pub struct PgPollRepository {
    pool: PgPool,
}

impl PgPollRepository {
    /// Create a new PgPollRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PollRepository for PgPollRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<Poll>> {
        let result = sqlx::query_as::<_, PollModel>(
            r#"
            SELECT id, organiser_email, organiser_name, event_title, location,
                   candidate_dates, deadline, edit_token, final_date, cancelled_at,
                   closing_soon_sent, post_deadline_sent, low_votes_reminder_count,
                   last_low_votes_reminder, created_at, updated_at
            FROM polls
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Poll::from))
    }

    #[instrument(skip(self, poll), fields(poll_id = %poll.id))]
    async fn create(&self, poll: &Poll) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO polls (id, organiser_email, organiser_name, event_title, location,
                               candidate_dates, deadline, edit_token, final_date, cancelled_at,
                               closing_soon_sent, post_deadline_sent, low_votes_reminder_count,
                               last_low_votes_reminder, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(&poll.id)
        .bind(&poll.organiser_email)
        .bind(&poll.organiser_name)
        .bind(&poll.event_title)
        .bind(&poll.location)
        .bind(&poll.candidate_dates)
        .bind(poll.deadline)
        .bind(&poll.edit_token)
        .bind(poll.final_date)
        .bind(poll.cancelled_at)
        .bind(poll.closing_soon_sent)
        .bind(poll.post_deadline_sent)
        .bind(poll.low_votes_reminder_count)
        .bind(poll.last_low_votes_reminder)
        .bind(poll.created_at)
        .bind(poll.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_active(&self) -> RepoResult<Vec<Poll>> {
        let results = sqlx::query_as::<_, PollModel>(
            r#"
            SELECT id, organiser_email, organiser_name, event_title, location,
                   candidate_dates, deadline, edit_token, final_date, cancelled_at,
                   closing_soon_sent, post_deadline_sent, low_votes_reminder_count,
                   last_low_votes_reminder, created_at, updated_at
            FROM polls
            WHERE final_date IS NULL AND cancelled_at IS NULL
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Poll::from).collect())
    }

    #[instrument(skip(self))]
    async fn set_final_date(&self, id: &str, final_date: NaiveDate) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE polls
            SET final_date = $2, updated_at = NOW()
            WHERE id = $1 AND final_date IS NULL AND cancelled_at IS NULL
            "#,
        )
        .bind(id)
        .bind(final_date)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn set_cancelled(&self, id: &str, cancelled_at: DateTime<Utc>) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE polls
            SET cancelled_at = $2, updated_at = NOW()
            WHERE id = $1 AND final_date IS NULL AND cancelled_at IS NULL
            "#,
        )
        .bind(id)
        .bind(cancelled_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn extend_deadline(&self, id: &str, new_deadline: DateTime<Utc>) -> RepoResult<bool> {
        // An extension re-arms both deadline-bound reminders.
        let result = sqlx::query(
            r#"
            UPDATE polls
            SET deadline = $2,
                closing_soon_sent = FALSE,
                post_deadline_sent = FALSE,
                updated_at = NOW()
            WHERE id = $1 AND final_date IS NULL AND cancelled_at IS NULL
            "#,
        )
        .bind(id)
        .bind(new_deadline)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn mark_closing_soon_sent(&self, id: &str) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE polls
            SET closing_soon_sent = TRUE, updated_at = NOW()
            WHERE id = $1 AND closing_soon_sent = FALSE
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn mark_post_deadline_sent(&self, id: &str) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE polls
            SET post_deadline_sent = TRUE, updated_at = NOW()
            WHERE id = $1 AND post_deadline_sent = FALSE
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn record_low_votes_reminder(&self, id: &str, at: DateTime<Utc>) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE polls
            SET low_votes_reminder_count = low_votes_reminder_count + 1,
                last_low_votes_reminder = $2,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(poll_not_found(id));
        }

        Ok(())
    }
}
