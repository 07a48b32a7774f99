//! Tag endpoints

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::{AppState, error::ApiResult};

/// Query parameters for the popular-tags list
#[derive(Debug, Deserialize)]
pub struct PopularTagsQuery {
    pub count: Option<i64>,
}

/// List all tags ordered by name
pub async fn list_tags(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let tags = state.tag_repository.get_all().await?;

    Ok(Json(tags))
}

/// List the most used tags
pub async fn popular_tags(
    State(state): State<AppState>,
    Query(query): Query<PopularTagsQuery>,
) -> ApiResult<impl IntoResponse> {
    let count = query.count.unwrap_or(10).clamp(1, 100);
    let tags = state.tag_repository.get_popular(count).await?;

    Ok(Json(tags))
}
