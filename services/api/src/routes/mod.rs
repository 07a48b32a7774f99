//! API service routes

pub mod answers;
pub mod auth;
pub mod comments;
pub mod questions;
pub mod tags;
pub mod votes;

use axum::{
    Json, Router, middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde_json::json;

use crate::{AppState, middleware::auth_middleware};

/// Create the router for the Q&A service
///
/// Mutating routes sit behind the JWT bearer middleware; reads and the
/// auth endpoints are public.
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/questions", post(questions::create_question))
        .route("/questions/:id", put(questions::update_question))
        .route("/questions/:id", delete(questions::delete_question))
        .route("/answers", post(answers::create_answer))
        .route("/answers/:id", put(answers::update_answer))
        .route("/answers/:id", delete(answers::delete_answer))
        .route("/answers/:id/accept", post(answers::accept_answer))
        .route("/comments", post(comments::create_comment))
        .route("/comments/:id", put(comments::update_comment))
        .route("/comments/:id", delete(comments::delete_comment))
        .route("/votes", post(votes::cast_vote))
        .route("/votes/me", get(votes::get_user_vote))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/questions", get(questions::list_questions))
        .route("/questions/latest", get(questions::latest_questions))
        .route("/questions/:id", get(questions::get_question))
        .route("/questions/:id/views", post(questions::record_view))
        .route("/questions/:id/answers", get(answers::list_answers))
        .route("/answers/:id", get(answers::get_answer))
        .route("/tags", get(tags::list_tags))
        .route("/tags/popular", get(tags::popular_tags))
        .route("/votes/count", get(votes::get_vote_count))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "qa-api"
    }))
}
