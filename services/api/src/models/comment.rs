//! Comment model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Comment entity; attached to exactly one of a question or an answer
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub body: String,
    pub user_id: Uuid,
    pub question_id: Option<Uuid>,
    pub answer_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// New comment payload; exactly one of the target ids must be set
#[derive(Debug, Clone, Deserialize)]
pub struct NewComment {
    pub body: String,
    pub question_id: Option<Uuid>,
    pub answer_id: Option<Uuid>,
}

/// Comment update payload
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateComment {
    pub body: String,
}

/// Comment as rendered under a question or answer
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CommentView {
    pub id: Uuid,
    pub body: String,
    pub user_id: Uuid,
    pub author: String,
    pub created_at: DateTime<Utc>,
}
