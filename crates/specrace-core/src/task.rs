//! Cancellable task contract
//!
//! Implement [`CancellableTask`] to define a branch workload. A task given a
//! token must poll it at bounded intervals and return
//! [`TaskError::Cancelled`] promptly after it is signalled. A task given no
//! token runs to natural completion.

use crate::cancel::CancellationToken;
use crate::types::TaskOutput;

/// Result of one task execution
pub type TaskResult = Result<TaskOutput, TaskError>;

/// Task-level failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    /// Stopped on its cancellation signal; an expected outcome for a loser
    #[error("branch cancelled")]
    Cancelled,

    /// Unexpected failure; fatal to the enclosing run
    #[error("{0}")]
    Other(String),
}

impl TaskError {
    /// Create an `Other` failure
    #[inline]
    pub fn other(cause: impl Into<String>) -> Self {
        Self::Other(cause.into())
    }
}

/// Branch workload
///
/// Tasks own no mutable state between calls and may be executed any number
/// of times, from any thread.
pub trait CancellableTask: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Run the workload
    ///
    /// # Errors
    /// - `TaskError::Cancelled` once `cancel` is observed signalled
    /// - `TaskError::Other` on invalid input or internal failure
    fn execute(&self, cancel: Option<&CancellationToken>) -> TaskResult;
}
