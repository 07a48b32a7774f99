//! Tag repository and the tag resolver
//!
//! Tag names are canonicalized to trimmed lower-case. Resolution runs
//! inside the caller's transaction so a question and its tags commit as
//! one unit. Tags are never deleted.

use sqlx::{PgConnection, PgPool};
use tracing::info;

use crate::error::ApiResult;
use crate::models::{Tag, TagWithCount};

/// Split a comma-separated tag list into canonical names.
///
/// Names are trimmed, lower-cased, empties dropped, and duplicates removed
/// preserving first occurrence order.
pub fn parse_tag_names(tags_text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for raw in tags_text.split(',') {
        let name = raw.trim().to_lowercase();
        if name.is_empty() || names.contains(&name) {
            continue;
        }
        names.push(name);
    }

    names
}

/// Resolve a comma-separated tag list to tag entities, creating missing
/// tags, in the caller's transaction. The returned list preserves the
/// order of first occurrence in the input.
pub async fn get_or_create_tags(conn: &mut PgConnection, tags_text: &str) -> ApiResult<Vec<Tag>> {
    let names = parse_tag_names(tags_text);
    let mut tags = Vec::with_capacity(names.len());

    for name in names {
        let existing = sqlx::query_as::<_, Tag>(
            r#"
            SELECT id, name, created_at
            FROM tags
            WHERE name = $1
            "#,
        )
        .bind(&name)
        .fetch_optional(&mut *conn)
        .await?;

        let tag = match existing {
            Some(tag) => tag,
            None => {
                // Upsert so a concurrent transaction creating the same tag
                // yields its row instead of a unique violation.
                let tag = sqlx::query_as::<_, Tag>(
                    r#"
                    INSERT INTO tags (name)
                    VALUES ($1)
                    ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
                    RETURNING id, name, created_at
                    "#,
                )
                .bind(&name)
                .fetch_one(&mut *conn)
                .await?;
                info!("New tag created: {}", tag.name);
                tag
            }
        };

        tags.push(tag);
    }

    Ok(tags)
}

/// Tag repository for read operations
#[derive(Clone)]
pub struct TagRepository {
    pool: PgPool,
}

impl TagRepository {
    /// Create a new tag repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get all tags ordered by name
    pub async fn get_all(&self) -> ApiResult<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT id, name, created_at
            FROM tags
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }

    /// Get the tags used by the most questions
    pub async fn get_popular(&self, count: i64) -> ApiResult<Vec<TagWithCount>> {
        let tags = sqlx::query_as::<_, TagWithCount>(
            r#"
            SELECT t.id, t.name, t.created_at,
                   COUNT(qt.question_id) AS question_count
            FROM tags t
            LEFT JOIN question_tags qt ON qt.tag_id = t.id
            GROUP BY t.id, t.name, t.created_at
            ORDER BY question_count DESC, t.name
            LIMIT $1
            "#,
        )
        .bind(count)
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }
}
