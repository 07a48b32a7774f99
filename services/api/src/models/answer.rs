//! Answer model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::comment::CommentView;

/// Answer entity
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Answer {
    pub id: Uuid,
    pub body: String,
    pub vote_count: i32,
    pub is_accepted: bool,
    pub question_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// New answer payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewAnswer {
    pub body: String,
    pub question_id: Uuid,
}

/// Answer update payload
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAnswer {
    pub body: String,
}

/// Answer as shown on a question's detail page, with author and comments
#[derive(Debug, Clone, Serialize)]
pub struct AnswerDetail {
    pub id: Uuid,
    pub body: String,
    pub vote_count: i32,
    pub is_accepted: bool,
    pub question_id: Uuid,
    pub user_id: Uuid,
    pub author: String,
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
