//! Registration and login endpoints

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use tracing::{error, info};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    models::{LoginCredentials, NewUser},
    validation::{validate_email, validate_password, validate_username},
};

/// Register a new user and issue a token for the new identity
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> ApiResult<impl IntoResponse> {
    validate_username(&payload.username).map_err(ApiError::Validation)?;
    validate_email(&payload.email).map_err(ApiError::Validation)?;
    validate_password(&payload.password).map_err(ApiError::Validation)?;

    let user = state.user_repository.create(&payload).await?;

    let token = state.jwt_service.generate_token(&user).map_err(|e| {
        error!("Failed to generate token: {}", e);
        ApiError::InternalServerError
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Registration successful",
            "token": token,
            "user": user.to_response(),
        })),
    ))
}

/// Authenticate a user and issue a token
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginCredentials>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .user_repository
        .find_by_username_or_email(&payload.username_or_email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    if !state.user_repository.verify_password(&user, &payload.password)? {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = state.jwt_service.generate_token(&user).map_err(|e| {
        error!("Failed to generate token: {}", e);
        ApiError::InternalServerError
    })?;

    info!("User {} logged in successfully", user.username);

    Ok(Json(json!({
        "message": "Login successful",
        "token": token,
        "user": user.to_response(),
    })))
}
