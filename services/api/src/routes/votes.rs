//! Vote endpoints

use axum::{
    Json,
    extract::{Extension, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    models::{Target, VoteType},
};

/// Vote request payload; `vote_type` is 1 for an upvote, -1 for a downvote
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub vote_type: i32,
    pub question_id: Option<Uuid>,
    pub answer_id: Option<Uuid>,
}

/// Query parameters identifying a vote target
#[derive(Debug, Deserialize)]
pub struct VoteTargetQuery {
    pub question_id: Option<Uuid>,
    pub answer_id: Option<Uuid>,
}

/// Cast, flip, or retract a vote on a question or answer
pub async fn cast_vote(
    State(state): State<AppState>,
    Extension(user_id): Extension<Uuid>,
    Json(payload): Json<VoteRequest>,
) -> ApiResult<impl IntoResponse> {
    let vote_type = VoteType::try_from(payload.vote_type).map_err(ApiError::Validation)?;
    let target = Target::from_ids(payload.question_id, payload.answer_id)
        .map_err(ApiError::Validation)?;

    let outcome = state.vote_repository.cast(user_id, target, vote_type).await?;

    Ok(Json(json!({
        "message": outcome.message(),
        "action": outcome.action,
        "vote_count": outcome.vote_count,
    })))
}

/// Get the cached vote count for a question or answer
pub async fn get_vote_count(
    State(state): State<AppState>,
    Query(query): Query<VoteTargetQuery>,
) -> ApiResult<impl IntoResponse> {
    let target =
        Target::from_ids(query.question_id, query.answer_id).map_err(ApiError::Validation)?;

    let vote_count = state.vote_repository.get_count(target).await?;

    Ok(Json(json!({ "vote_count": vote_count })))
}

/// Get the acting user's live vote on a target, if any
pub async fn get_user_vote(
    State(state): State<AppState>,
    Extension(user_id): Extension<Uuid>,
    Query(query): Query<VoteTargetQuery>,
) -> ApiResult<impl IntoResponse> {
    let target =
        Target::from_ids(query.question_id, query.answer_id).map_err(ApiError::Validation)?;

    let vote = state.vote_repository.get_user_vote(user_id, target).await?;

    Ok(Json(json!({
        "vote_type": vote.map(VoteType::value),
    })))
}
