//! Answer repository for database operations

use sqlx::{PgPool, Row};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{Answer, NewAnswer, UpdateAnswer};

const ANSWER_COLUMNS: &str =
    "id, body, vote_count, is_accepted, question_id, user_id, created_at, updated_at";

/// Answer repository
#[derive(Clone)]
pub struct AnswerRepository {
    pool: PgPool,
}

impl AnswerRepository {
    /// Create a new answer repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Post an answer to a question
    pub async fn create(&self, new_answer: &NewAnswer, user_id: Uuid) -> ApiResult<Answer> {
        let question_exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM questions WHERE id = $1")
            .bind(new_answer.question_id)
            .fetch_optional(&self.pool)
            .await?;

        if question_exists.is_none() {
            return Err(ApiError::NotFound("Question not found".to_string()));
        }

        let answer = sqlx::query_as::<_, Answer>(&format!(
            r#"
            INSERT INTO answers (body, question_id, user_id)
            VALUES ($1, $2, $3)
            RETURNING {ANSWER_COLUMNS}
            "#,
        ))
        .bind(new_answer.body.trim())
        .bind(new_answer.question_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Answer {} created for question {} by user {}",
            answer.id, answer.question_id, user_id
        );
        Ok(answer)
    }

    /// Update an answer's body
    pub async fn update(
        &self,
        answer_id: Uuid,
        update: &UpdateAnswer,
        user_id: Uuid,
    ) -> ApiResult<Answer> {
        let mut tx = self.pool.begin().await?;

        let owner =
            sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM answers WHERE id = $1 FOR UPDATE")
                .bind(answer_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| ApiError::NotFound("Answer not found".to_string()))?;

        if owner != user_id {
            warn!(
                "User {} attempted to update answer {} owned by user {}",
                user_id, answer_id, owner
            );
            return Err(ApiError::Forbidden(
                "You do not have permission to update this answer".to_string(),
            ));
        }

        let answer = sqlx::query_as::<_, Answer>(&format!(
            r#"
            UPDATE answers
            SET body = $1, updated_at = now()
            WHERE id = $2
            RETURNING {ANSWER_COLUMNS}
            "#,
        ))
        .bind(update.body.trim())
        .bind(answer_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Answer {} updated by user {}", answer_id, user_id);
        Ok(answer)
    }

    /// Delete an answer together with its votes and comments
    pub async fn delete(&self, answer_id: Uuid, user_id: Uuid) -> ApiResult<()> {
        let mut tx = self.pool.begin().await?;

        let owner =
            sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM answers WHERE id = $1 FOR UPDATE")
                .bind(answer_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| ApiError::NotFound("Answer not found".to_string()))?;

        if owner != user_id {
            warn!(
                "User {} attempted to delete answer {} owned by user {}",
                user_id, answer_id, owner
            );
            return Err(ApiError::Forbidden(
                "You do not have permission to delete this answer".to_string(),
            ));
        }

        sqlx::query("DELETE FROM votes WHERE answer_id = $1")
            .bind(answer_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM comments WHERE answer_id = $1")
            .bind(answer_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM answers WHERE id = $1")
            .bind(answer_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!("Answer {} deleted by user {}", answer_id, user_id);
        Ok(())
    }

    /// Accept an answer for its question
    ///
    /// Only the question's owner may accept. Any previously accepted
    /// answer under the same question is reset in the same transaction, so
    /// at most one answer per question is ever accepted.
    pub async fn accept(&self, answer_id: Uuid, user_id: Uuid) -> ApiResult<Answer> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            SELECT a.question_id, q.user_id AS question_owner
            FROM answers a
            JOIN questions q ON q.id = a.question_id
            WHERE a.id = $1
            FOR UPDATE
            "#,
        )
        .bind(answer_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("Answer not found".to_string()))?;

        let question_id: Uuid = row.get("question_id");
        let question_owner: Uuid = row.get("question_owner");

        if question_owner != user_id {
            warn!(
                "User {} attempted to accept answer {} for question owned by user {}",
                user_id, answer_id, question_owner
            );
            return Err(ApiError::Forbidden(
                "Only the question owner can accept answers".to_string(),
            ));
        }

        sqlx::query(
            "UPDATE answers SET is_accepted = FALSE WHERE question_id = $1 AND is_accepted",
        )
        .bind(question_id)
        .execute(&mut *tx)
        .await?;

        let answer = sqlx::query_as::<_, Answer>(&format!(
            r#"
            UPDATE answers
            SET is_accepted = TRUE
            WHERE id = $1
            RETURNING {ANSWER_COLUMNS}
            "#,
        ))
        .bind(answer_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Answer {} accepted for question {}", answer_id, question_id);
        Ok(answer)
    }

    /// Find an answer by ID
    pub async fn find_by_id(&self, answer_id: Uuid) -> ApiResult<Option<Answer>> {
        let answer = sqlx::query_as::<_, Answer>(&format!(
            "SELECT {ANSWER_COLUMNS} FROM answers WHERE id = $1",
        ))
        .bind(answer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(answer)
    }

    /// List a question's answers, accepted first, then by vote count
    pub async fn list_by_question(&self, question_id: Uuid) -> ApiResult<Vec<Answer>> {
        let answers = sqlx::query_as::<_, Answer>(&format!(
            r#"
            SELECT {ANSWER_COLUMNS}
            FROM answers
            WHERE question_id = $1
            ORDER BY is_accepted DESC, vote_count DESC, created_at
            "#,
        ))
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(answers)
    }
}
