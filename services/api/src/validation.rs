//! Input validation utilities
//!
//! All bounds are enforced before anything touches the store. Length
//! checks count characters, not bytes.

use regex::Regex;
use std::sync::OnceLock;

/// Question title bounds
const TITLE_MIN: usize = 10;
const TITLE_MAX: usize = 200;

/// Question and answer body bounds
const BODY_MIN: usize = 20;
const BODY_MAX: usize = 5000;

/// Comment body bounds
const COMMENT_MIN: usize = 5;
const COMMENT_MAX: usize = 500;

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    let length = username.chars().count();
    if length < 3 {
        return Err("Username must be at least 3 characters long".to_string());
    }

    if length > 50 {
        return Err("Username must be at most 50 characters long".to_string());
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err("Username can only contain letters, numbers, and underscores".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.chars().count() > 100 {
        return Err("Email must be at most 100 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    let length = password.chars().count();
    if length < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if length > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Validate a question title (10-200 characters)
pub fn validate_question_title(title: &str) -> Result<(), String> {
    let length = title.trim().chars().count();
    if length < TITLE_MIN {
        return Err(format!(
            "Title must be at least {} characters long",
            TITLE_MIN
        ));
    }

    if length > TITLE_MAX {
        return Err(format!("Title must be at most {} characters long", TITLE_MAX));
    }

    Ok(())
}

/// Validate a question or answer body (20-5000 characters)
pub fn validate_post_body(body: &str) -> Result<(), String> {
    let length = body.trim().chars().count();
    if length < BODY_MIN {
        return Err(format!("Body must be at least {} characters long", BODY_MIN));
    }

    if length > BODY_MAX {
        return Err(format!("Body must be at most {} characters long", BODY_MAX));
    }

    Ok(())
}

/// Validate a comment body (5-500 characters)
pub fn validate_comment_body(body: &str) -> Result<(), String> {
    let length = body.trim().chars().count();
    if length < COMMENT_MIN {
        return Err(format!(
            "Comment must be at least {} characters long",
            COMMENT_MIN
        ));
    }

    if length > COMMENT_MAX {
        return Err(format!(
            "Comment must be at most {} characters long",
            COMMENT_MAX
        ));
    }

    Ok(())
}
