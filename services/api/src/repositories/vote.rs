//! Vote ledger repository
//!
//! Enforces at-most-one vote per (user, target) and keeps the target's
//! cached vote count equal to the sum of its live vote rows. Every cast
//! runs in one transaction that locks the target row first, so concurrent
//! casts from the same user serialize instead of double-applying a delta;
//! the partial unique indexes on the votes table are the backstop.

use sqlx::{PgPool, Row};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::vote::vote_transition;
use crate::models::{Target, VoteAction, VoteOutcome, VoteType};

/// Vote repository
#[derive(Clone)]
pub struct VoteRepository {
    pool: PgPool,
}

impl VoteRepository {
    /// Create a new vote repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Cast a vote on a question or answer
    ///
    /// A first vote is recorded, a repeated vote of the same type is
    /// retracted, and a vote of the opposite type flips in place. The
    /// target's cached count moves with the ledger in the same
    /// transaction. Voting on one's own content is rejected before the
    /// ledger is touched.
    pub async fn cast(
        &self,
        user_id: Uuid,
        target: Target,
        vote_type: VoteType,
    ) -> ApiResult<VoteOutcome> {
        let mut tx = self.pool.begin().await?;

        let target_row = match target {
            Target::Question(id) => {
                sqlx::query("SELECT user_id FROM questions WHERE id = $1 FOR UPDATE")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?
            }
            Target::Answer(id) => {
                sqlx::query("SELECT user_id FROM answers WHERE id = $1 FOR UPDATE")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?
            }
        };

        let target_row = target_row.ok_or_else(|| {
            let message = match target {
                Target::Question(_) => "Question not found",
                Target::Answer(_) => "Answer not found",
            };
            ApiError::NotFound(message.to_string())
        })?;

        let owner: Uuid = target_row.get("user_id");
        if owner == user_id {
            warn!("User {} attempted to vote on their own content", user_id);
            return Err(ApiError::Forbidden(
                "You cannot vote on your own content".to_string(),
            ));
        }

        let existing = sqlx::query(
            r#"
            SELECT id, vote_type
            FROM votes
            WHERE user_id = $1
              AND question_id IS NOT DISTINCT FROM $2
              AND answer_id IS NOT DISTINCT FROM $3
            "#,
        )
        .bind(user_id)
        .bind(target.question_id())
        .bind(target.answer_id())
        .fetch_optional(&mut *tx)
        .await?;

        let existing = existing.map(|row| {
            let id: Uuid = row.get("id");
            let vote_type: VoteType = row.get("vote_type");
            (id, vote_type)
        });

        let (action, delta) = vote_transition(existing.map(|(_, t)| t), vote_type);

        match (action, existing) {
            (VoteAction::Removed, Some((vote_id, _))) => {
                sqlx::query("DELETE FROM votes WHERE id = $1")
                    .bind(vote_id)
                    .execute(&mut *tx)
                    .await?;
            }
            (VoteAction::Updated, Some((vote_id, _))) => {
                sqlx::query("UPDATE votes SET vote_type = $1 WHERE id = $2")
                    .bind(vote_type)
                    .bind(vote_id)
                    .execute(&mut *tx)
                    .await?;
            }
            (VoteAction::Created, _) => {
                sqlx::query(
                    r#"
                    INSERT INTO votes (vote_type, user_id, question_id, answer_id)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(vote_type)
                .bind(user_id)
                .bind(target.question_id())
                .bind(target.answer_id())
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    ApiError::conflict_on_unique(e, "A vote for this content already exists")
                })?;
            }
            // vote_transition only removes or updates an existing vote.
            (VoteAction::Removed | VoteAction::Updated, None) => {
                return Err(ApiError::InternalServerError);
            }
        }

        let vote_count: i32 = match target {
            Target::Question(id) => {
                sqlx::query_scalar(
                    "UPDATE questions SET vote_count = vote_count + $1 WHERE id = $2 RETURNING vote_count",
                )
                .bind(delta)
                .bind(id)
                .fetch_one(&mut *tx)
                .await?
            }
            Target::Answer(id) => {
                sqlx::query_scalar(
                    "UPDATE answers SET vote_count = vote_count + $1 WHERE id = $2 RETURNING vote_count",
                )
                .bind(delta)
                .bind(id)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        tx.commit().await?;

        match action {
            VoteAction::Created => info!("Vote created by user {}", user_id),
            VoteAction::Updated => info!("Vote updated by user {}", user_id),
            VoteAction::Removed => info!("Vote removed by user {}", user_id),
        }

        Ok(VoteOutcome { action, vote_count })
    }

    /// Read the target's cached vote count; a missing target counts as 0.
    pub async fn get_count(&self, target: Target) -> ApiResult<i32> {
        let count = match target {
            Target::Question(id) => {
                sqlx::query_scalar::<_, i32>("SELECT vote_count FROM questions WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?
            }
            Target::Answer(id) => {
                sqlx::query_scalar::<_, i32>("SELECT vote_count FROM answers WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?
            }
        };

        Ok(count.unwrap_or(0))
    }

    /// Get a user's live vote on a target, if any
    pub async fn get_user_vote(&self, user_id: Uuid, target: Target) -> ApiResult<Option<VoteType>> {
        let vote_type = sqlx::query_scalar::<_, VoteType>(
            r#"
            SELECT vote_type
            FROM votes
            WHERE user_id = $1
              AND question_id IS NOT DISTINCT FROM $2
              AND answer_id IS NOT DISTINCT FROM $3
            "#,
        )
        .bind(user_id)
        .bind(target.question_id())
        .bind(target.answer_id())
        .fetch_optional(&self.pool)
        .await?;

        Ok(vote_type)
    }

    /// Recompute the target's vote count by summing its live vote rows.
    ///
    /// Consistency-check path: must always agree with the cached count
    /// returned by [`get_count`](Self::get_count).
    pub async fn recount(&self, target: Target) -> ApiResult<i32> {
        let sum = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(vote_type), 0)
            FROM votes
            WHERE question_id IS NOT DISTINCT FROM $1
              AND answer_id IS NOT DISTINCT FROM $2
            "#,
        )
        .bind(target.question_id())
        .bind(target.answer_id())
        .fetch_one(&self.pool)
        .await?;

        Ok(sum as i32)
    }
}
