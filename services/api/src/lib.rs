//! Q&A platform API service
//!
//! Users register, post questions tagged by topic, post answers, comment,
//! and vote on questions and answers. The library target exposes the
//! handlers and repositories so the integration tests can drive them
//! directly; the binary wires them to a listener.

pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod validation;

use sqlx::PgPool;

use crate::jwt::JwtService;
use crate::repositories::{
    AnswerRepository, CommentRepository, QuestionRepository, TagRepository, UserRepository,
    VoteRepository,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_service: JwtService,
    pub user_repository: UserRepository,
    pub question_repository: QuestionRepository,
    pub answer_repository: AnswerRepository,
    pub comment_repository: CommentRepository,
    pub vote_repository: VoteRepository,
    pub tag_repository: TagRepository,
}

impl AppState {
    /// Build the application state over a connection pool
    pub fn new(pool: PgPool, jwt_service: JwtService) -> Self {
        Self {
            user_repository: UserRepository::new(pool.clone()),
            question_repository: QuestionRepository::new(pool.clone()),
            answer_repository: AnswerRepository::new(pool.clone()),
            comment_repository: CommentRepository::new(pool.clone()),
            vote_repository: VoteRepository::new(pool.clone()),
            tag_repository: TagRepository::new(pool.clone()),
            db_pool: pool,
            jwt_service,
        }
    }
}
