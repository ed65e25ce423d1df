//! PostgreSQL implementation of VoteRepository

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::instrument;

use setdate_core::entities::Vote;
use setdate_core::traits::{RepoResult, VoteRepository};

use crate::models::VoteModel;

use super::error::map_db_error;

/// PostgreSQL implementation of VoteRepository
#[derive(Clone)]
pub struct PgVoteRepository {
    pool: PgPool,
}

impl PgVoteRepository {
    /// Create a new PgVoteRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoteRepository for PgVoteRepository {
    #[instrument(skip(self, vote), fields(poll_id = %vote.poll_id, voter_key = %vote.voter_key))]
    async fn upsert(&self, vote: &Vote) -> RepoResult<()> {
        // Last write wins on the (poll_id, voter_key) key; a re-vote
        // replaces the whole response set, never merges.
        sqlx::query(
            r#"
            INSERT INTO votes (poll_id, voter_key, voter_name, responses, message, submitted_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (poll_id, voter_key) DO UPDATE
            SET voter_name = EXCLUDED.voter_name,
                responses = EXCLUDED.responses,
                message = EXCLUDED.message,
                submitted_at = EXCLUDED.submitted_at
            "#,
        )
        .bind(&vote.poll_id)
        .bind(&vote.voter_key)
        .bind(&vote.voter_name)
        .bind(Json(&vote.responses))
        .bind(&vote.message)
        .bind(vote.submitted_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_for_poll(&self, poll_id: &str) -> RepoResult<Vec<Vote>> {
        let results = sqlx::query_as::<_, VoteModel>(
            r#"
            SELECT poll_id, voter_key, voter_name, responses, message, submitted_at
            FROM votes
            WHERE poll_id = $1
            ORDER BY submitted_at ASC
            "#,
        )
        .bind(poll_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Vote::from).collect())
    }

    #[instrument(skip(self))]
    async fn count_excluding(&self, poll_id: &str, voter_key: &str) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM votes
            WHERE poll_id = $1 AND voter_key <> $2
            "#,
        )
        .bind(poll_id)
        .bind(voter_key)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgVoteRepository>();
    }
}
