//! Branch pair and single-branch execution
//!
//! [`execute_branch`] turns one task invocation into exactly one
//! [`BranchOutcome`], classifying the task result by pattern match.

use crate::cancel::CancellationToken;
use crate::config::TrialConfig;
use crate::task::{CancellableTask, TaskError};
use crate::types::{BranchId, BranchOutcome};
use crate::workload::{HashSearchTask, PrimeCountTask};
use std::time::Instant;

/// The two competing tasks, addressed by identity
pub struct BranchSet {
    a: Box<dyn CancellableTask>,
    b: Box<dyn CancellableTask>,
}

impl BranchSet {
    /// Create from explicit tasks
    #[must_use]
    pub fn new(a: Box<dyn CancellableTask>, b: Box<dyn CancellableTask>) -> Self {
        Self { a, b }
    }

    /// Hash search on `A`, prime count on `B`
    #[must_use]
    pub fn from_config(config: &TrialConfig) -> Self {
        Self::new(
            Box::new(HashSearchTask::new(
                config.base_data.clone(),
                config.difficulty,
            )),
            Box::new(PrimeCountTask::new(config.primes_limit)),
        )
    }

    /// Task for an identity
    #[inline]
    #[must_use]
    pub fn get(&self, branch: BranchId) -> &dyn CancellableTask {
        match branch {
            BranchId::A => self.a.as_ref(),
            BranchId::B => self.b.as_ref(),
        }
    }
}

impl std::fmt::Debug for BranchSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BranchSet")
            .field("a", &self.a.name())
            .field("b", &self.b.name())
            .finish()
    }
}

/// Run one task and record its terminal state
pub fn execute_branch(
    branch: BranchId,
    task: &dyn CancellableTask,
    cancel: Option<&CancellationToken>,
) -> BranchOutcome {
    let started = Instant::now();
    let result = task.execute(cancel);
    let finished = Instant::now();

    let mut outcome = BranchOutcome {
        branch,
        numeric: 0,
        detail: String::new(),
        started,
        finished,
        duration: finished.saturating_duration_since(started),
        cancelled: false,
        error: None,
    };

    match result {
        Ok(output) => {
            outcome.numeric = output.numeric;
            outcome.detail = output.detail;
        }
        Err(TaskError::Cancelled) => outcome.cancelled = true,
        Err(TaskError::Other(cause)) => outcome.error = Some(cause),
    }

    tracing::debug!(
        branch = %branch,
        task = task.name(),
        cancelled = outcome.cancelled,
        failed = outcome.is_failed(),
        duration_us = outcome.duration.as_micros(),
        "branch finished"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_branch_carries_output() {
        let task = PrimeCountTask::new(10);
        let outcome = execute_branch(BranchId::B, &task, None);
        assert_eq!(outcome.branch, BranchId::B);
        assert_eq!(outcome.numeric, 4);
        assert_eq!(outcome.detail, "count=4,last=7");
        assert!(!outcome.cancelled);
        assert!(outcome.error.is_none());
        assert!(outcome.finished >= outcome.started);
    }

    #[test]
    fn cancelled_branch_is_flagged_not_failed() {
        let token = CancellationToken::new();
        token.signal();
        let task = PrimeCountTask::new(1_000_000);
        let outcome = execute_branch(BranchId::B, &task, Some(&token));
        assert!(outcome.cancelled);
        assert!(!outcome.is_failed());
        assert_eq!(outcome.numeric, 0);
        assert!(outcome.detail.is_empty());
    }

    #[test]
    fn failed_branch_carries_cause() {
        let task = HashSearchTask::new("x", 0);
        let outcome = execute_branch(BranchId::A, &task, None);
        assert!(!outcome.cancelled);
        assert!(outcome.error.as_deref().unwrap().contains("difficulty"));
    }

    #[test]
    fn from_config_maps_identities() {
        let set = BranchSet::from_config(&TrialConfig::default());
        assert_eq!(set.get(BranchId::A).name(), "hash-search");
        assert_eq!(set.get(BranchId::B).name(), "prime-count");
    }
}
