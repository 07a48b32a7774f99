//! Comment endpoints

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
    models::{NewComment, Target, UpdateComment},
    validation::validate_comment_body,
};

/// Post a comment on a question or answer
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(user_id): Extension<Uuid>,
    Json(payload): Json<NewComment>,
) -> ApiResult<impl IntoResponse> {
    validate_comment_body(&payload.body).map_err(ApiError::Validation)?;

    let target = Target::from_ids(payload.question_id, payload.answer_id)
        .map_err(ApiError::Validation)?;

    let comment = state
        .comment_repository
        .create(&payload.body, target, user_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Comment posted successfully",
            "comment": comment,
        })),
    ))
}

/// Update a comment
pub async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(user_id): Extension<Uuid>,
    Json(payload): Json<UpdateComment>,
) -> ApiResult<impl IntoResponse> {
    validate_comment_body(&payload.body).map_err(ApiError::Validation)?;

    let comment = state
        .comment_repository
        .update(id, &payload, user_id)
        .await?;

    Ok(Json(json!({
        "message": "Comment updated successfully",
        "comment": comment,
    })))
}

/// Delete a comment
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(user_id): Extension<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.comment_repository.delete(id, user_id).await?;

    Ok(Json(json!({
        "message": "Comment deleted successfully",
    })))
}
