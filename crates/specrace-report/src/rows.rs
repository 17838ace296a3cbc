//! Flattened report rows
//!
//! One [`OutcomeRow`] per branch outcome, tagged with its run's fields, in
//! `(mode, run_index)` order; one [`SummaryRow`] for the whole trial.

use serde::{Deserialize, Serialize};
use specrace_core::{BranchId, RunMode, RunRecord, Summary, TrialReport};
use std::time::Duration;

/// Milliseconds as a float
#[inline]
#[must_use]
pub fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// One branch outcome with its parent run's fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRow {
    /// Strategy of the parent run
    pub mode: RunMode,
    /// Parent run index
    pub run: u32,
    /// Branch identity
    pub branch: BranchId,
    /// Whether this branch was selected
    pub was_winner: bool,
    /// Whether this branch stopped on cancellation
    pub cancelled: bool,
    /// Numeric result
    pub result_numeric: i64,
    /// Detail text
    pub result_detail: String,
    /// Selector value of the parent run
    pub condition_value: i64,
    /// Selector time of the parent run
    pub condition_duration_ms: f64,
    /// Branch start, from run start
    pub branch_start_ms: f64,
    /// Branch end, from run start
    pub branch_end_ms: f64,
    /// Branch duration
    pub branch_duration_ms: f64,
    /// Total run duration
    pub total_duration_ms: f64,
    /// Failure cause, if any
    pub error: Option<String>,
}

impl OutcomeRow {
    /// Rows for every outcome of one record
    pub fn from_record(record: &RunRecord) -> impl Iterator<Item = OutcomeRow> + '_ {
        record.outcomes.iter().map(move |outcome| OutcomeRow {
            mode: record.mode,
            run: record.run_index,
            branch: outcome.branch,
            was_winner: record.is_winner(outcome),
            cancelled: outcome.cancelled,
            result_numeric: outcome.numeric,
            result_detail: outcome.detail.clone(),
            condition_value: record.selector_value,
            condition_duration_ms: millis(record.selector_duration),
            branch_start_ms: millis(outcome.start_offset(record.run_start)),
            branch_end_ms: millis(outcome.end_offset(record.run_start)),
            branch_duration_ms: millis(outcome.duration),
            total_duration_ms: millis(record.total_duration),
            error: outcome.error.clone(),
        })
    }
}

/// Rows for every record of a report, speculative first
#[must_use]
pub fn outcome_rows(report: &TrialReport) -> Vec<OutcomeRow> {
    report.records().flat_map(OutcomeRow::from_record).collect()
}

/// Averages and speedup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// Speculative runs averaged
    pub runs_speculative: usize,
    /// Sequential runs averaged
    pub runs_sequential: usize,
    /// Mean numeric over speculative outcomes
    pub avg_numeric_speculative: f64,
    /// Mean numeric over sequential outcomes
    pub avg_numeric_sequential: f64,
    /// Mean speculative total duration
    pub avg_speculative_ms: f64,
    /// Mean sequential total duration
    pub avg_sequential_ms: f64,
    /// Sequential over speculative mean
    pub speedup: f64,
}

impl From<&Summary> for SummaryRow {
    fn from(summary: &Summary) -> Self {
        Self {
            runs_speculative: summary.speculative.runs,
            runs_sequential: summary.sequential.runs,
            avg_numeric_speculative: summary.speculative.avg_numeric,
            avg_numeric_sequential: summary.sequential.avg_numeric,
            avg_speculative_ms: millis(summary.speculative.avg_total_duration),
            avg_sequential_ms: millis(summary.sequential.avg_total_duration),
            speedup: summary.speedup,
        }
    }
}
