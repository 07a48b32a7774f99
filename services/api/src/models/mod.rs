//! Domain models for the Q&A platform

pub mod answer;
pub mod comment;
pub mod question;
pub mod tag;
pub mod user;
pub mod vote;

pub use answer::{Answer, AnswerDetail, NewAnswer, UpdateAnswer};
pub use comment::{Comment, CommentView, NewComment, UpdateComment};
pub use question::{NewQuestion, Question, QuestionDetail, QuestionSummary, UpdateQuestion};
pub use tag::{Tag, TagWithCount};
pub use user::{LoginCredentials, NewUser, User, UserResponse};
pub use vote::{Vote, VoteAction, VoteOutcome, VoteType};

use uuid::Uuid;

/// The question or answer a vote or comment attaches to.
///
/// Resolved once at the handler boundary from the optional-id pair, so the
/// rest of the service never branches on which nullable foreign key is
/// populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Question(Uuid),
    Answer(Uuid),
}

impl Target {
    /// Resolve a target from an optional question id and answer id.
    ///
    /// Exactly one of the two must be supplied; anything else is rejected
    /// before the store is touched.
    pub fn from_ids(question_id: Option<Uuid>, answer_id: Option<Uuid>) -> Result<Self, String> {
        match (question_id, answer_id) {
            (Some(id), None) => Ok(Target::Question(id)),
            (None, Some(id)) => Ok(Target::Answer(id)),
            (None, None) => Err("A question or answer must be specified".to_string()),
            (Some(_), Some(_)) => {
                Err("Only one of question or answer may be specified".to_string())
            }
        }
    }

    /// The question id, if this target is a question.
    pub fn question_id(&self) -> Option<Uuid> {
        match self {
            Target::Question(id) => Some(*id),
            Target::Answer(_) => None,
        }
    }

    /// The answer id, if this target is an answer.
    pub fn answer_id(&self) -> Option<Uuid> {
        match self {
            Target::Question(_) => None,
            Target::Answer(id) => Some(*id),
        }
    }
}
