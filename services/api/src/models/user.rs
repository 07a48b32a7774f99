//! User model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User entity
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub reputation: i32,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The public view of this user, without the credential hash.
    pub fn to_response(&self) -> UserResponse {
        UserResponse {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            reputation: self.reputation,
            created_at: self.created_at,
        }
    }
}

/// Public user representation returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub reputation: i32,
    pub created_at: DateTime<Utc>,
}

/// New user registration payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// User login credentials
#[derive(Debug, Clone, Deserialize)]
pub struct LoginCredentials {
    pub username_or_email: String,
    pub password: String,
}
