//! Tag model

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Tag entity; `name` holds the canonical lower-case form
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Tag with the number of questions carrying it
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TagWithCount {
    pub id: Uuid,
    pub name: String,
    pub question_count: i64,
    pub created_at: DateTime<Utc>,
}
