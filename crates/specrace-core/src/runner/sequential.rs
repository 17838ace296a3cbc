//! Sequential baseline
//!
//! Selector first, then only the winning branch, without a cancellation
//! token. No concurrency.

use super::RunStrategy;
use crate::branch::{execute_branch, BranchSet};
use crate::error::TrialError;
use crate::selector::Selector;
use crate::types::{BranchId, RunMode, RunRecord};
use chrono::Utc;
use std::time::Instant;

const MODE: RunMode = RunMode::Sequential;

/// Runs only the branch the selector picks
#[derive(Debug)]
pub struct SequentialRunner<'a> {
    branches: &'a BranchSet,
    threshold: i64,
}

impl<'a> SequentialRunner<'a> {
    /// Create a new sequential runner
    #[inline]
    #[must_use]
    pub fn new(branches: &'a BranchSet, threshold: i64) -> Self {
        Self {
            branches,
            threshold,
        }
    }
}

impl RunStrategy for SequentialRunner<'_> {
    fn mode(&self) -> RunMode {
        MODE
    }

    fn run(&self, run_index: u32, selector: &mut dyn Selector) -> Result<RunRecord, TrialError> {
        let run_start = Instant::now();
        let started_at = Utc::now();

        let reading = selector.evaluate();
        let winner = BranchId::select(reading.value, self.threshold);
        tracing::debug!(
            run = run_index,
            selector_value = reading.value,
            winner = %winner,
            "decision made, running winner only"
        );

        let outcome = execute_branch(winner, self.branches.get(winner), None);
        if let Some(cause) = &outcome.error {
            tracing::error!(run = run_index, branch = %winner, "branch failed: {cause}");
            return Err(TrialError::RunAborted {
                mode: MODE,
                run_index,
                branch: winner,
                cause: cause.clone(),
            });
        }

        Ok(RunRecord {
            mode: MODE,
            run_index,
            selector_value: reading.value,
            selector_duration: reading.duration,
            winner,
            total_duration: run_start.elapsed(),
            run_start,
            started_at,
            outcomes: vec![outcome],
        })
    }
}
