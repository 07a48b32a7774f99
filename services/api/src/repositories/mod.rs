//! Repositories for database operations

pub mod answer;
pub mod comment;
pub mod question;
pub mod tag;
pub mod user;
pub mod vote;

pub use answer::AnswerRepository;
pub use comment::CommentRepository;
pub use question::QuestionRepository;
pub use tag::TagRepository;
pub use user::UserRepository;
pub use vote::VoteRepository;
