use thiserror::Error;

/// Reasons a progress submission is turned away. The record is left
/// untouched in every case.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressError {
    #[error("A comment is required to record progress on goal {goal_id}")]
    MissingComment { goal_id: u64 },

    #[error("Goal {0} not found")]
    UnknownGoal(u64),

    #[error("Goal {goal_id} is not owned by user {user_id}")]
    NotOwner { goal_id: u64, user_id: u64 },
}
