//! Trial sequence driver
//!
//! Runs every speculative trial, then every sequential trial, and stops at the
//! first run-level failure. Records are kept in `(mode, run_index)` order.

use crate::aggregate::Summary;
use crate::branch::BranchSet;
use crate::config::TrialConfig;
use crate::error::TrialError;
use crate::runner::{RunStrategy, SequentialRunner, SpeculativeRunner};
use crate::selector::{MatrixTraceSelector, Selector};
use crate::types::RunRecord;
use std::time::Instant;

/// Ordered records for both strategies plus their summary
#[derive(Debug, Clone)]
pub struct TrialReport {
    /// Speculative records, by run index
    pub speculative: Vec<RunRecord>,
    /// Sequential records, by run index
    pub sequential: Vec<RunRecord>,
    /// Averages and speedup
    pub summary: Summary,
}

impl TrialReport {
    /// Build a report, computing the summary
    #[must_use]
    pub fn new(speculative: Vec<RunRecord>, sequential: Vec<RunRecord>) -> Self {
        let summary = Summary::compute(&speculative, &sequential);
        Self {
            speculative,
            sequential,
            summary,
        }
    }

    /// Every record, speculative first
    pub fn records(&self) -> impl Iterator<Item = &RunRecord> {
        self.speculative.iter().chain(self.sequential.iter())
    }
}

/// Run `runs` trials of one strategy
///
/// # Errors
/// Propagates the first run-level failure; earlier records are discarded.
pub fn run_series(
    strategy: &dyn RunStrategy,
    runs: u32,
    selector: &mut dyn Selector,
) -> Result<Vec<RunRecord>, TrialError> {
    let mode = strategy.mode();
    let start = Instant::now();
    let mut records = Vec::with_capacity(runs as usize);

    for run_index in 1..=runs {
        let record = strategy.run(run_index, selector)?;
        tracing::debug!(
            mode = %mode,
            run = run_index,
            winner = %record.winner,
            total_ms = record.total_duration.as_secs_f64() * 1000.0,
            "run complete"
        );
        records.push(record);
    }

    tracing::info!(
        "{} {} runs finished in {:.3}s",
        records.len(),
        mode,
        start.elapsed().as_secs_f64()
    );
    Ok(records)
}

/// Run both strategies with explicit branches and selector
///
/// # Errors
/// - `TrialError::ConfigInvalid` before any run if `config` is invalid
/// - Any run-level failure, which halts the sequence
pub fn run_trials_with(
    config: &TrialConfig,
    branches: &BranchSet,
    selector: &mut dyn Selector,
) -> Result<TrialReport, TrialError> {
    config.validate()?;

    tracing::info!(
        runs = config.runs,
        threshold = config.threshold,
        "starting trials with {:?}",
        branches
    );

    let speculative = SpeculativeRunner::new(branches, config.threshold);
    let speculative = run_series(&speculative, config.runs, selector)?;

    let sequential = SequentialRunner::new(branches, config.threshold);
    let sequential = run_series(&sequential, config.runs, selector)?;

    Ok(TrialReport::new(speculative, sequential))
}

/// Run both strategies with the configured workloads
///
/// Branch `A` is the hash search, branch `B` the prime count, and the
/// selector is the matrix trace, seeded from `config.seed` when set.
///
/// # Errors
/// See [`run_trials_with`].
pub fn run_trials(config: &TrialConfig) -> Result<TrialReport, TrialError> {
    config.validate()?;
    let branches = BranchSet::from_config(config);
    let mut selector = MatrixTraceSelector::with_seed(config.matrix_size, config.seed);
    run_trials_with(config, &branches, &mut selector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::types::{BranchId, RunMode};

    fn small_config() -> TrialConfig {
        TrialConfig::new()
            .with_matrix_size(4)
            .with_difficulty(1)
            .with_base_data("x")
            .with_primes_limit(200)
            .with_runs(3)
            .with_seed(Some(11))
    }

    #[test]
    fn invalid_config_halts_before_work() {
        let err = run_trials(&small_config().with_runs(0)).unwrap_err();
        assert!(matches!(
            err,
            TrialError::ConfigInvalid(ConfigError::NotPositive { field: "runs" })
        ));
    }

    #[test]
    fn records_are_ordered_by_mode_and_index() {
        let report = run_trials(&small_config()).unwrap();
        let keys: Vec<(RunMode, u32)> = report.records().map(|r| (r.mode, r.run_index)).collect();
        assert_eq!(
            keys,
            vec![
                (RunMode::Speculative, 1),
                (RunMode::Speculative, 2),
                (RunMode::Speculative, 3),
                (RunMode::Sequential, 1),
                (RunMode::Sequential, 2),
                (RunMode::Sequential, 3),
            ]
        );
        assert!(report.speculative.iter().all(|r| r.outcomes.len() == 2));
        assert!(report.sequential.iter().all(|r| r.outcomes.len() == 1));
        assert_eq!(report.summary.speculative.runs, 3);
    }

    #[test]
    fn unreachable_threshold_always_picks_b() {
        let config = small_config().with_threshold(i64::MAX);
        let report = run_trials(&config).unwrap();
        for record in report.records() {
            assert_eq!(record.winner, BranchId::B);
        }
    }
}
