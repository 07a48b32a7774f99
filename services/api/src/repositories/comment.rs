//! Comment repository for database operations

use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{Comment, Target, UpdateComment};

const COMMENT_COLUMNS: &str = "id, body, user_id, question_id, answer_id, created_at";

/// Comment repository
#[derive(Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    /// Create a new comment repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Post a comment on a question or answer
    pub async fn create(&self, body: &str, target: Target, user_id: Uuid) -> ApiResult<Comment> {
        let mut tx = self.pool.begin().await?;

        let target_exists = match target {
            Target::Question(id) => {
                sqlx::query_scalar::<_, Uuid>("SELECT id FROM questions WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?
            }
            Target::Answer(id) => {
                sqlx::query_scalar::<_, Uuid>("SELECT id FROM answers WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?
            }
        };

        if target_exists.is_none() {
            let message = match target {
                Target::Question(_) => "Question not found",
                Target::Answer(_) => "Answer not found",
            };
            return Err(ApiError::NotFound(message.to_string()));
        }

        let comment = sqlx::query_as::<_, Comment>(&format!(
            r#"
            INSERT INTO comments (body, user_id, question_id, answer_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {COMMENT_COLUMNS}
            "#,
        ))
        .bind(body.trim())
        .bind(user_id)
        .bind(target.question_id())
        .bind(target.answer_id())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Comment {} created by user {}", comment.id, user_id);
        Ok(comment)
    }

    /// Update a comment's body
    pub async fn update(
        &self,
        comment_id: Uuid,
        update: &UpdateComment,
        user_id: Uuid,
    ) -> ApiResult<Comment> {
        let mut tx = self.pool.begin().await?;

        let owner =
            sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM comments WHERE id = $1 FOR UPDATE")
                .bind(comment_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))?;

        if owner != user_id {
            warn!(
                "User {} attempted to update comment {} owned by user {}",
                user_id, comment_id, owner
            );
            return Err(ApiError::Forbidden(
                "You do not have permission to update this comment".to_string(),
            ));
        }

        let comment = sqlx::query_as::<_, Comment>(&format!(
            r#"
            UPDATE comments
            SET body = $1
            WHERE id = $2
            RETURNING {COMMENT_COLUMNS}
            "#,
        ))
        .bind(update.body.trim())
        .bind(comment_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Comment {} updated by user {}", comment_id, user_id);
        Ok(comment)
    }

    /// Delete a comment
    pub async fn delete(&self, comment_id: Uuid, user_id: Uuid) -> ApiResult<()> {
        let mut tx = self.pool.begin().await?;

        let owner =
            sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM comments WHERE id = $1 FOR UPDATE")
                .bind(comment_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))?;

        if owner != user_id {
            warn!(
                "User {} attempted to delete comment {} owned by user {}",
                user_id, comment_id, owner
            );
            return Err(ApiError::Forbidden(
                "You do not have permission to delete this comment".to_string(),
            ));
        }

        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!("Comment {} deleted by user {}", comment_id, user_id);
        Ok(())
    }
}
