//! JWT service for token issuance and validation
//!
//! Tokens are signed with the HS256 algorithm using a shared secret. The
//! service resolves a presented token to the owning user id, or fails.

use anyhow::Result;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::models::User;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared secret for signing and verifying tokens
    pub secret: String,
    /// Token expiration time in seconds (default: 1 hour)
    pub token_expiry: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: shared HMAC secret (required)
    /// - `JWT_TOKEN_EXPIRY`: token expiry in seconds (default: 3600)
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;

        let token_expiry = std::env::var("JWT_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .unwrap_or(3600);

        Ok(JwtConfig {
            secret,
            token_expiry,
        })
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Username
    pub username: String,
    /// Email
    pub email: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_expiry: u64,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        JwtService {
            encoding_key,
            decoding_key,
            validation,
            token_expiry: config.token_expiry,
        }
    }

    /// Generate a token for a user
    pub fn generate_token(&self, user: &User) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
            .as_secs();

        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            iat: now,
            exp: now + self.token_expiry,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a token and return the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }

    /// Get the token expiry time in seconds
    pub fn token_expiry(&self) -> u64 {
        self.token_expiry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_service(expiry: u64) -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret".to_string(),
            token_expiry: expiry,
        })
    }

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "hash".to_string(),
            reputation: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let service = test_service(3600);
        let user = test_user();

        let token = service.generate_token(&user).expect("token generation");
        let claims = service.validate_token(&token).expect("token validation");

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, user.username);
        assert_eq!(claims.email, user.email);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let service = test_service(3600);
        let other = JwtService::new(JwtConfig {
            secret: "different-secret".to_string(),
            token_expiry: 3600,
        });

        let token = other.generate_token(&test_user()).expect("token generation");
        assert!(service.validate_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = test_service(3600);
        let user = test_user();

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("current time")
            .as_secs();

        // Back-date expiry well past the default validation leeway.
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .expect("token generation");

        assert!(service.validate_token(&token).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let service = test_service(3600);
        assert!(service.validate_token("not.a.token").is_err());
    }
}
