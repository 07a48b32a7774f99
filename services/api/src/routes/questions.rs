//! Question endpoints

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    models::{NewQuestion, UpdateQuestion},
    validation::{validate_post_body, validate_question_title},
};

/// Query parameters for the question list
#[derive(Debug, Deserialize)]
pub struct QuestionListQuery {
    pub search: Option<String>,
    pub tag: Option<String>,
}

/// Query parameters for the latest-questions list
#[derive(Debug, Deserialize)]
pub struct LatestQuery {
    pub count: Option<i64>,
}

/// Create a question
pub async fn create_question(
    State(state): State<AppState>,
    Extension(user_id): Extension<Uuid>,
    Json(payload): Json<NewQuestion>,
) -> ApiResult<impl IntoResponse> {
    validate_question_title(&payload.title).map_err(ApiError::Validation)?;
    validate_post_body(&payload.body).map_err(ApiError::Validation)?;

    let question = state.question_repository.create(&payload, user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Question created successfully",
            "question": question,
        })),
    ))
}

/// Update a question
pub async fn update_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(user_id): Extension<Uuid>,
    Json(payload): Json<UpdateQuestion>,
) -> ApiResult<impl IntoResponse> {
    validate_question_title(&payload.title).map_err(ApiError::Validation)?;
    validate_post_body(&payload.body).map_err(ApiError::Validation)?;

    let question = state
        .question_repository
        .update(id, &payload, user_id)
        .await?;

    Ok(Json(json!({
        "message": "Question updated successfully",
        "question": question,
    })))
}

/// Delete a question and all content depending on it
pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(user_id): Extension<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.question_repository.delete(id, user_id).await?;

    Ok(Json(json!({
        "message": "Question and all related content deleted successfully",
    })))
}

/// Get a question's full detail view
pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let question = state
        .question_repository
        .find_detail(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;

    Ok(Json(question))
}

/// Record a view of a question
pub async fn record_view(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.question_repository.increment_view_count(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List questions, optionally filtered by search term and tag
pub async fn list_questions(
    State(state): State<AppState>,
    Query(query): Query<QuestionListQuery>,
) -> ApiResult<impl IntoResponse> {
    let questions = state
        .question_repository
        .list(query.search.as_deref(), query.tag.as_deref())
        .await?;

    Ok(Json(questions))
}

/// List the latest questions
pub async fn latest_questions(
    State(state): State<AppState>,
    Query(query): Query<LatestQuery>,
) -> ApiResult<impl IntoResponse> {
    let count = query.count.unwrap_or(10).clamp(1, 100);
    let questions = state.question_repository.list_latest(count).await?;

    Ok(Json(questions))
}
