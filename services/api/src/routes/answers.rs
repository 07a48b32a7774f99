//! Answer endpoints

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    models::{NewAnswer, UpdateAnswer},
    validation::validate_post_body,
};

/// Post an answer to a question
pub async fn create_answer(
    State(state): State<AppState>,
    Extension(user_id): Extension<Uuid>,
    Json(payload): Json<NewAnswer>,
) -> ApiResult<impl IntoResponse> {
    validate_post_body(&payload.body).map_err(ApiError::Validation)?;

    let answer = state.answer_repository.create(&payload, user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Answer posted successfully",
            "answer": answer,
        })),
    ))
}

/// Update an answer
pub async fn update_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(user_id): Extension<Uuid>,
    Json(payload): Json<UpdateAnswer>,
) -> ApiResult<impl IntoResponse> {
    validate_post_body(&payload.body).map_err(ApiError::Validation)?;

    let answer = state.answer_repository.update(id, &payload, user_id).await?;

    Ok(Json(json!({
        "message": "Answer updated successfully",
        "answer": answer,
    })))
}

/// Delete an answer
pub async fn delete_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(user_id): Extension<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.answer_repository.delete(id, user_id).await?;

    Ok(Json(json!({
        "message": "Answer deleted successfully",
    })))
}

/// Accept an answer for its question
pub async fn accept_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(user_id): Extension<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let answer = state.answer_repository.accept(id, user_id).await?;

    Ok(Json(json!({
        "message": "Answer accepted successfully",
        "answer": answer,
    })))
}

/// Get an answer by ID
pub async fn get_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let answer = state
        .answer_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Answer not found".to_string()))?;

    Ok(Json(answer))
}

/// List a question's answers
pub async fn list_answers(
    State(state): State<AppState>,
    Path(question_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let answers = state.answer_repository.list_by_question(question_id).await?;

    Ok(Json(answers))
}
