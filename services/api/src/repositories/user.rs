//! User repository for database operations

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use sqlx::PgPool;
use tracing::{error, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::models::{NewUser, User};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, email, password_hash, reputation, created_at";

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a new user
    ///
    /// The username and email must both be unique; the unique constraints
    /// on the table back up the pre-check under concurrent registration.
    pub async fn create(&self, new_user: &NewUser) -> ApiResult<User> {
        let existing = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM users
            WHERE username = $1 OR email = $2
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .fetch_optional(&self.pool)
        .await?;

        if existing.is_some() {
            warn!("Registration failed: username or email already exists");
            return Err(ApiError::Conflict(
                "Username or email already exists".to_string(),
            ));
        }

        let salt = SaltString::generate(&mut rand::thread_rng());
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(new_user.password.as_bytes(), &salt)
            .map_err(|e| {
                error!("Failed to hash password: {}", e);
                ApiError::InternalServerError
            })?
            .to_string();

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApiError::conflict_on_unique(e, "Username or email already exists"))?;

        info!("User {} registered successfully", user.username);
        Ok(user)
    }

    /// Find a user by username or email
    pub async fn find_by_username_or_email(&self, identifier: &str) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE username = $1 OR email = $1
            "#,
        ))
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Verify a user's password against the stored hash
    pub fn verify_password(&self, user: &User, password: &str) -> ApiResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash).map_err(|e| {
            error!("Failed to parse password hash: {}", e);
            ApiError::InternalServerError
        })?;

        let argon2 = Argon2::default();
        Ok(argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
