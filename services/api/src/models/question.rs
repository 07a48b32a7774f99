//! Question model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::answer::AnswerDetail;
use crate::models::comment::CommentView;
use crate::models::tag::Tag;

/// Question entity
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Question {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub view_count: i32,
    pub vote_count: i32,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// New question payload; `tags` is a comma-separated list
#[derive(Debug, Clone, Deserialize)]
pub struct NewQuestion {
    pub title: String,
    pub body: String,
    pub tags: String,
}

/// Question update payload
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateQuestion {
    pub title: String,
    pub body: String,
    pub tags: String,
}

/// Question row as listed on index and search pages
#[derive(Debug, Clone, Serialize)]
pub struct QuestionSummary {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub view_count: i32,
    pub vote_count: i32,
    pub answer_count: i64,
    pub author: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Fully expanded question as shown on its detail page
#[derive(Debug, Clone, Serialize)]
pub struct QuestionDetail {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub view_count: i32,
    pub vote_count: i32,
    pub author: String,
    pub user_id: Uuid,
    pub tags: Vec<Tag>,
    pub answers: Vec<AnswerDetail>,
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
