//! Error types for specrace
//!
//! - Configuration preconditions, checked before any run
//! - Run-level failures, fatal to the whole trial sequence
//!
//! Branch cancellation is not an error at this level: it is recorded on the
//! outcome and never escapes a run.

use crate::types::{BranchId, RunMode};

/// Configuration precondition violated
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A count or size was zero
    #[error("{field} must be greater than zero")]
    NotPositive {
        /// Offending field
        field: &'static str,
    },

    /// Difficulty exceeds the digest width
    #[error("difficulty must be at most {max} (got {value})")]
    DifficultyTooLarge {
        /// Requested difficulty
        value: u32,
        /// Hex digits in a digest
        max: u32,
    },
}

/// Trial-level failure
#[derive(Debug, thiserror::Error)]
pub enum TrialError {
    /// Configuration rejected before any work began
    #[error("invalid configuration: {0}")]
    ConfigInvalid(#[from] ConfigError),

    /// A branch failed with something other than cancellation
    #[error("{mode} run {run_index} aborted: branch {branch} failed: {cause}")]
    RunAborted {
        /// Strategy of the aborted run
        mode: RunMode,
        /// Index of the aborted run
        run_index: u32,
        /// Failing branch
        branch: BranchId,
        /// Task failure cause
        cause: String,
    },

    /// The OS refused to start a branch thread
    #[error("{mode} run {run_index}: could not start branch {branch}: {source}")]
    Spawn {
        /// Strategy of the failed run
        mode: RunMode,
        /// Index of the failed run
        run_index: u32,
        /// Branch that could not start
        branch: BranchId,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A branch thread died without delivering its outcome
    #[error("{mode} run {run_index}: branch {branch} panicked")]
    BranchPanicked {
        /// Strategy of the failed run
        mode: RunMode,
        /// Index of the failed run
        run_index: u32,
        /// Branch that panicked
        branch: BranchId,
    },

    /// A branch delivered more than one outcome
    ///
    /// Guards the one-delivery-per-branch protocol. Each branch thread sends
    /// exactly once, so this is not expected at runtime.
    #[error("{mode} run {run_index}: branch {branch} delivered more than one outcome")]
    DuplicateDelivery {
        /// Strategy of the failed run
        mode: RunMode,
        /// Index of the failed run
        run_index: u32,
        /// Branch that delivered twice
        branch: BranchId,
    },
}

impl TrialError {
    /// Branch implicated in the failure, if any
    #[must_use]
    pub fn branch(&self) -> Option<BranchId> {
        match self {
            Self::ConfigInvalid(_) => None,
            Self::RunAborted { branch, .. }
            | Self::Spawn { branch, .. }
            | Self::BranchPanicked { branch, .. }
            | Self::DuplicateDelivery { branch, .. } => Some(*branch),
        }
    }

    /// Run index of the failure, if any
    #[must_use]
    pub fn run_index(&self) -> Option<u32> {
        match self {
            Self::ConfigInvalid(_) => None,
            Self::RunAborted { run_index, .. }
            | Self::Spawn { run_index, .. }
            | Self::BranchPanicked { run_index, .. }
            | Self::DuplicateDelivery { run_index, .. } => Some(*run_index),
        }
    }
}
