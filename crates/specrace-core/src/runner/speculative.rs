//! Speculative strategy
//!
//! # Protocol
//!
//! 1. **Start**: both branches are spawned on scoped threads, each with its
//!    own [`CancellationToken`] and a sender into a channel sized for both
//!    outcomes, so a delivery never blocks.
//! 2. **Decide**: the selector runs on the calling thread. Only after its
//!    value is compared against the threshold is the loser's token signalled.
//!    The winner's token is never signalled.
//! 3. **Collect**: outcomes are accepted in arrival order and slotted by
//!    identity. At most one outcome per identity is accepted.
//! 4. **Finish**: `total_duration` is taken once both slots are filled.
//!
//! On any failure both tokens are signalled before the scope joins, so no
//! branch thread outlives its run.

use super::RunStrategy;
use crate::branch::{execute_branch, BranchSet};
use crate::cancel::CancellationToken;
use crate::error::TrialError;
use crate::selector::Selector;
use crate::types::{BranchId, BranchOutcome, RunMode, RunRecord};
use chrono::{DateTime, Utc};
use crossbeam::channel::{self, Receiver};
use std::thread;
use std::time::Instant;

const MODE: RunMode = RunMode::Speculative;

/// Runs both branches concurrently and cancels the loser
#[derive(Debug)]
pub struct SpeculativeRunner<'a> {
    branches: &'a BranchSet,
    threshold: i64,
}

impl<'a> SpeculativeRunner<'a> {
    /// Create a new speculative runner
    #[inline]
    #[must_use]
    pub fn new(branches: &'a BranchSet, threshold: i64) -> Self {
        Self {
            branches,
            threshold,
        }
    }

    /// Selector, decision and collection; runs while both branches execute
    fn decide_and_collect(
        &self,
        run_index: u32,
        selector: &mut dyn Selector,
        tokens: &[CancellationToken; 2],
        outcomes: &Receiver<BranchOutcome>,
        run_start: Instant,
        started_at: DateTime<Utc>,
    ) -> Result<RunRecord, TrialError> {
        let reading = selector.evaluate();
        let winner = BranchId::select(reading.value, self.threshold);
        let loser = winner.other();
        tokens[loser.index()].signal();

        tracing::debug!(
            run = run_index,
            selector_value = reading.value,
            winner = %winner,
            "decision made, cancelling {loser}"
        );

        let mut slots: [Option<BranchOutcome>; 2] = [None, None];
        for _ in BranchId::ALL {
            let Ok(outcome) = outcomes.recv() else {
                let branch = BranchId::ALL
                    .into_iter()
                    .find(|b| slots[b.index()].is_none())
                    .unwrap_or(loser);
                return Err(TrialError::BranchPanicked {
                    mode: MODE,
                    run_index,
                    branch,
                });
            };

            if let Some(cause) = &outcome.error {
                tracing::error!(run = run_index, branch = %outcome.branch, "branch failed: {cause}");
                return Err(TrialError::RunAborted {
                    mode: MODE,
                    run_index,
                    branch: outcome.branch,
                    cause: cause.clone(),
                });
            }

            let slot = &mut slots[outcome.branch.index()];
            if slot.is_some() {
                return Err(TrialError::DuplicateDelivery {
                    mode: MODE,
                    run_index,
                    branch: outcome.branch,
                });
            }
            *slot = Some(outcome);
        }

        let total_duration = run_start.elapsed();
        let outcomes: Vec<BranchOutcome> = slots.into_iter().flatten().collect();

        for outcome in &outcomes {
            if outcome.branch == winner {
                debug_assert!(!outcome.cancelled, "winner observed a cancellation");
            } else if !outcome.cancelled {
                tracing::warn!(
                    run = run_index,
                    branch = %outcome.branch,
                    "losing branch completed before observing cancellation"
                );
            }
        }

        Ok(RunRecord {
            mode: MODE,
            run_index,
            selector_value: reading.value,
            selector_duration: reading.duration,
            winner,
            total_duration,
            run_start,
            started_at,
            outcomes,
        })
    }
}

impl RunStrategy for SpeculativeRunner<'_> {
    fn mode(&self) -> RunMode {
        MODE
    }

    fn run(&self, run_index: u32, selector: &mut dyn Selector) -> Result<RunRecord, TrialError> {
        let run_start = Instant::now();
        let started_at = Utc::now();
        let tokens = [CancellationToken::new(), CancellationToken::new()];
        let (tx, rx) = channel::bounded::<BranchOutcome>(BranchId::ALL.len());

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(BranchId::ALL.len());
            let mut spawn_error = None;

            for branch in BranchId::ALL {
                let task = self.branches.get(branch);
                let token = tokens[branch.index()].clone();
                let tx = tx.clone();
                let spawned = thread::Builder::new()
                    .name(format!("specrace-branch-{branch}"))
                    .spawn_scoped(scope, move || {
                        let outcome = execute_branch(branch, task, Some(&token));
                        // Receiver may already be gone after an abort.
                        let _ = tx.send(outcome);
                    });
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(source) => {
                        spawn_error = Some(TrialError::Spawn {
                            mode: MODE,
                            run_index,
                            branch,
                            source,
                        });
                        break;
                    }
                }
            }
            drop(tx);

            let result = match spawn_error {
                Some(err) => Err(err),
                None => self.decide_and_collect(
                    run_index, selector, &tokens, &rx, run_start, started_at,
                ),
            };

            if result.is_err() {
                for token in &tokens {
                    token.signal();
                }
            }
            drop(rx);

            let mut panicked = None;
            for (branch, handle) in BranchId::ALL.into_iter().zip(handles) {
                if handle.join().is_err() && panicked.is_none() {
                    panicked = Some(branch);
                }
            }

            match (result, panicked) {
                (Ok(_), Some(branch)) => Err(TrialError::BranchPanicked {
                    mode: MODE,
                    run_index,
                    branch,
                }),
                (result, _) => result,
            }
        })
    }
}
