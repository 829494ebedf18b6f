use thiserror::Error;

use dreamweek_core::error::CoreError;
use dreamweek_storage::StorageError;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("calendar error: {0}")]
    Core(#[from] CoreError),

    #[error("instance not found: {instance_id}")]
    InstanceNotFound { instance_id: String },

    #[error("dream not found: {dream_id}")]
    DreamNotFound { dream_id: String },

    #[error("goal not found: {goal_id}")]
    GoalNotFound { goal_id: String },

    #[error("invalid goal: {0}")]
    InvalidGoal(String),

    #[error("instance {instance_id} is not {expected}")]
    PolicyMismatch {
        instance_id: String,
        expected: &'static str,
    },
}

impl SchedulerError {
    /// Whether the error came from the persistence layer (and is worth a retry).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}
