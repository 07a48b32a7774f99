//! Vote model and the ledger transition rules
//!
//! The vote ledger keeps at most one live vote per (user, target) pair and
//! a denormalized running count on the target. The transition rules that
//! keep the two consistent are pure and live here; the repository applies
//! them inside a transaction.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Vote direction, stored as a signed integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[repr(i32)]
pub enum VoteType {
    Up = 1,
    Down = -1,
}

impl VoteType {
    /// The signed contribution of this vote to a target's count.
    pub fn value(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for VoteType {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(VoteType::Up),
            -1 => Ok(VoteType::Down),
            other => Err(format!("Invalid vote type: {}", other)),
        }
    }
}

/// Vote entity
#[derive(Debug, Clone, FromRow)]
pub struct Vote {
    pub id: Uuid,
    pub vote_type: VoteType,
    pub user_id: Uuid,
    pub question_id: Option<Uuid>,
    pub answer_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// What casting a vote did to the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteAction {
    Created,
    Updated,
    Removed,
}

/// Result of a cast operation, including the target's new cached count
#[derive(Debug, Clone, Serialize)]
pub struct VoteOutcome {
    pub action: VoteAction,
    pub vote_count: i32,
}

impl VoteOutcome {
    /// Human-readable message for the outcome.
    pub fn message(&self) -> &'static str {
        match self.action {
            VoteAction::Created => "Vote recorded successfully",
            VoteAction::Updated => "Vote updated",
            VoteAction::Removed => "Vote removed",
        }
    }
}

/// Decide what a vote request does to the ledger.
///
/// Returns the action to apply to the vote row together with the delta to
/// apply to the target's cached count:
/// - no existing vote: insert, count moves by the vote's value;
/// - same type as the existing vote: toggle off, count moves back by the
///   old value;
/// - opposite type: flip in place, count moves by the difference (±2).
pub fn vote_transition(existing: Option<VoteType>, requested: VoteType) -> (VoteAction, i32) {
    match existing {
        None => (VoteAction::Created, requested.value()),
        Some(old) if old == requested => (VoteAction::Removed, -old.value()),
        Some(old) => (VoteAction::Updated, requested.value() - old.value()),
    }
}
