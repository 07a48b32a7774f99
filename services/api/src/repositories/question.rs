//! Question repository for database operations
//!
//! Multi-step mutations (create/update with tag reassignment, cascading
//! delete) each run in a single transaction so no partial write is ever
//! visible.

use sqlx::{PgPool, Row};
use std::collections::HashMap;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{
    AnswerDetail, CommentView, NewQuestion, Question, QuestionDetail, QuestionSummary, Tag,
    UpdateQuestion,
};
use crate::repositories::tag::get_or_create_tags;

const QUESTION_COLUMNS: &str =
    "id, title, body, view_count, vote_count, user_id, created_at, updated_at";

/// Question repository
#[derive(Clone)]
pub struct QuestionRepository {
    pool: PgPool,
}

impl QuestionRepository {
    /// Create a new question repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a question with its resolved tag set
    pub async fn create(&self, new_question: &NewQuestion, user_id: Uuid) -> ApiResult<Question> {
        let mut tx = self.pool.begin().await?;

        let question = sqlx::query_as::<_, Question>(&format!(
            r#"
            INSERT INTO questions (title, body, user_id)
            VALUES ($1, $2, $3)
            RETURNING {QUESTION_COLUMNS}
            "#,
        ))
        .bind(new_question.title.trim())
        .bind(new_question.body.trim())
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        let tags = get_or_create_tags(&mut tx, &new_question.tags).await?;
        for tag in &tags {
            sqlx::query("INSERT INTO question_tags (question_id, tag_id) VALUES ($1, $2)")
                .bind(question.id)
                .bind(tag.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!("Question {} created by user {}", question.id, user_id);
        Ok(question)
    }

    /// Update a question's title, body, and tag set
    ///
    /// Tags use clear-then-reassign semantics: the existing links are
    /// dropped and the resolved set is attached fresh.
    pub async fn update(
        &self,
        question_id: Uuid,
        update: &UpdateQuestion,
        user_id: Uuid,
    ) -> ApiResult<Question> {
        let mut tx = self.pool.begin().await?;

        let owner = sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM questions WHERE id = $1 FOR UPDATE",
        )
        .bind(question_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;

        if owner != user_id {
            warn!(
                "User {} attempted to update question {} owned by user {}",
                user_id, question_id, owner
            );
            return Err(ApiError::Forbidden(
                "You do not have permission to update this question".to_string(),
            ));
        }

        let question = sqlx::query_as::<_, Question>(&format!(
            r#"
            UPDATE questions
            SET title = $1, body = $2, updated_at = now()
            WHERE id = $3
            RETURNING {QUESTION_COLUMNS}
            "#,
        ))
        .bind(update.title.trim())
        .bind(update.body.trim())
        .bind(question_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM question_tags WHERE question_id = $1")
            .bind(question_id)
            .execute(&mut *tx)
            .await?;

        let tags = get_or_create_tags(&mut tx, &update.tags).await?;
        for tag in &tags {
            sqlx::query("INSERT INTO question_tags (question_id, tag_id) VALUES ($1, $2)")
                .bind(question_id)
                .bind(tag.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!("Question {} updated by user {}", question_id, user_id);
        Ok(question)
    }

    /// Delete a question and everything that depends on it
    ///
    /// Deletion order is bottom-up over the dependency graph: votes on
    /// answers, comments on answers, the answers, comments on the
    /// question, votes on the question, the tag links, and finally the
    /// question itself. The whole sequence commits or rolls back as one
    /// unit. Tag entities persist.
    pub async fn delete(&self, question_id: Uuid, user_id: Uuid) -> ApiResult<()> {
        let mut tx = self.pool.begin().await?;

        let owner = sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM questions WHERE id = $1 FOR UPDATE",
        )
        .bind(question_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;

        if owner != user_id {
            warn!(
                "User {} attempted to delete question {} owned by user {}",
                user_id, question_id, owner
            );
            return Err(ApiError::Forbidden(
                "You do not have permission to delete this question".to_string(),
            ));
        }

        let answer_votes = sqlx::query(
            r#"
            DELETE FROM votes
            WHERE answer_id IN (SELECT id FROM answers WHERE question_id = $1)
            "#,
        )
        .bind(question_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let answer_comments = sqlx::query(
            r#"
            DELETE FROM comments
            WHERE answer_id IN (SELECT id FROM answers WHERE question_id = $1)
            "#,
        )
        .bind(question_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let answers = sqlx::query("DELETE FROM answers WHERE question_id = $1")
            .bind(question_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let comments = sqlx::query("DELETE FROM comments WHERE question_id = $1")
            .bind(question_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let votes = sqlx::query("DELETE FROM votes WHERE question_id = $1")
            .bind(question_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM question_tags WHERE question_id = $1")
            .bind(question_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(question_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            "Question {} deleted by user {} ({} answers, {} answer votes, {} answer comments, {} comments, {} votes)",
            question_id, user_id, answers, answer_votes, answer_comments, comments, votes
        );
        Ok(())
    }

    /// Find a question by ID
    pub async fn find_by_id(&self, question_id: Uuid) -> ApiResult<Option<Question>> {
        let question = sqlx::query_as::<_, Question>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE id = $1",
        ))
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(question)
    }

    /// Assemble the full detail view of a question: author, tags, answers
    /// ordered accepted-then-votes with their comments, and the question's
    /// own comments.
    pub async fn find_detail(&self, question_id: Uuid) -> ApiResult<Option<QuestionDetail>> {
        let row = sqlx::query(
            r#"
            SELECT q.id, q.title, q.body, q.view_count, q.vote_count, q.user_id,
                   q.created_at, q.updated_at, u.username AS author
            FROM questions q
            JOIN users u ON u.id = q.user_id
            WHERE q.id = $1
            "#,
        )
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id, t.name, t.created_at
            FROM tags t
            JOIN question_tags qt ON qt.tag_id = t.id
            WHERE qt.question_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        let answer_rows = sqlx::query(
            r#"
            SELECT a.id, a.body, a.vote_count, a.is_accepted, a.question_id,
                   a.user_id, a.created_at, a.updated_at, u.username AS author
            FROM answers a
            JOIN users u ON u.id = a.user_id
            WHERE a.question_id = $1
            ORDER BY a.is_accepted DESC, a.vote_count DESC, a.created_at
            "#,
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        let comment_rows = sqlx::query(
            r#"
            SELECT c.id, c.body, c.user_id, c.answer_id, c.created_at,
                   u.username AS author
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.answer_id IN (SELECT id FROM answers WHERE question_id = $1)
            ORDER BY c.created_at
            "#,
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        let mut comments_by_answer: HashMap<Uuid, Vec<CommentView>> = HashMap::new();
        for comment in comment_rows {
            let answer_id: Uuid = comment.get("answer_id");
            comments_by_answer
                .entry(answer_id)
                .or_default()
                .push(CommentView {
                    id: comment.get("id"),
                    body: comment.get("body"),
                    user_id: comment.get("user_id"),
                    author: comment.get("author"),
                    created_at: comment.get("created_at"),
                });
        }

        let answers = answer_rows
            .into_iter()
            .map(|row| {
                let id: Uuid = row.get("id");
                AnswerDetail {
                    id,
                    body: row.get("body"),
                    vote_count: row.get("vote_count"),
                    is_accepted: row.get("is_accepted"),
                    question_id: row.get("question_id"),
                    user_id: row.get("user_id"),
                    author: row.get("author"),
                    comments: comments_by_answer.remove(&id).unwrap_or_default(),
                    created_at: row.get("created_at"),
                    updated_at: row.get("updated_at"),
                }
            })
            .collect();

        let comments = sqlx::query_as::<_, CommentView>(
            r#"
            SELECT c.id, c.body, c.user_id, c.created_at, u.username AS author
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.question_id = $1
            ORDER BY c.created_at
            "#,
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(QuestionDetail {
            id: row.get("id"),
            title: row.get("title"),
            body: row.get("body"),
            view_count: row.get("view_count"),
            vote_count: row.get("vote_count"),
            author: row.get("author"),
            user_id: row.get("user_id"),
            tags,
            answers,
            comments,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }))
    }

    /// List questions, optionally filtered by a search term over title and
    /// body and/or a tag name, newest first.
    pub async fn list(
        &self,
        search_term: Option<&str>,
        tag: Option<&str>,
    ) -> ApiResult<Vec<QuestionSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT q.id, q.title, q.body, q.view_count, q.vote_count, q.created_at,
                   u.username AS author,
                   (SELECT COUNT(*) FROM answers a WHERE a.question_id = q.id) AS answer_count
            FROM questions q
            JOIN users u ON u.id = q.user_id
            WHERE ($1::text IS NULL OR q.title ILIKE '%' || $1 || '%' OR q.body ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR EXISTS (
                    SELECT 1 FROM question_tags qt
                    JOIN tags t ON t.id = qt.tag_id
                    WHERE qt.question_id = q.id AND t.name = lower($2)))
            ORDER BY q.created_at DESC
            "#,
        )
        .bind(search_term)
        .bind(tag)
        .fetch_all(&self.pool)
        .await?;

        self.to_summaries(rows).await
    }

    /// List the most recently created questions
    pub async fn list_latest(&self, count: i64) -> ApiResult<Vec<QuestionSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT q.id, q.title, q.body, q.view_count, q.vote_count, q.created_at,
                   u.username AS author,
                   (SELECT COUNT(*) FROM answers a WHERE a.question_id = q.id) AS answer_count
            FROM questions q
            JOIN users u ON u.id = q.user_id
            ORDER BY q.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(count)
        .fetch_all(&self.pool)
        .await?;

        self.to_summaries(rows).await
    }

    /// Increment a question's view counter; a missing id is a no-op.
    pub async fn increment_view_count(&self, question_id: Uuid) -> ApiResult<()> {
        sqlx::query("UPDATE questions SET view_count = view_count + 1 WHERE id = $1")
            .bind(question_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn to_summaries(
        &self,
        rows: Vec<sqlx::postgres::PgRow>,
    ) -> ApiResult<Vec<QuestionSummary>> {
        let ids: Vec<Uuid> = rows.iter().map(|row| row.get("id")).collect();

        let tag_rows = sqlx::query(
            r#"
            SELECT qt.question_id, t.name
            FROM question_tags qt
            JOIN tags t ON t.id = qt.tag_id
            WHERE qt.question_id = ANY($1)
            ORDER BY t.name
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut tags_by_question: HashMap<Uuid, Vec<String>> = HashMap::new();
        for row in tag_rows {
            let question_id: Uuid = row.get("question_id");
            tags_by_question
                .entry(question_id)
                .or_default()
                .push(row.get("name"));
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let id: Uuid = row.get("id");
                QuestionSummary {
                    id,
                    title: row.get("title"),
                    body: row.get("body"),
                    view_count: row.get("view_count"),
                    vote_count: row.get("vote_count"),
                    answer_count: row.get("answer_count"),
                    author: row.get("author"),
                    tags: tags_by_question.remove(&id).unwrap_or_default(),
                    created_at: row.get("created_at"),
                }
            })
            .collect())
    }
}
