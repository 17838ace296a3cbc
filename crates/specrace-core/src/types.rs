//! Core types for specrace
//!
//! Defines the records produced by one trial:
//! - Branch identities and the winner rule
//! - Per-branch outcomes
//! - Per-run records for both strategies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// Identity of one of the two speculative branches
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BranchId {
    /// Taken when the selector value reaches the threshold
    A,
    /// Taken otherwise
    B,
}

impl BranchId {
    /// Both identities, in reporting order
    pub const ALL: [BranchId; 2] = [BranchId::A, BranchId::B];

    /// Pick the winning branch for a selector value
    ///
    /// `A` when `value >= threshold`, `B` otherwise.
    #[inline]
    #[must_use]
    pub fn select(value: i64, threshold: i64) -> Self {
        if value >= threshold {
            BranchId::A
        } else {
            BranchId::B
        }
    }

    /// The opposing identity
    #[inline]
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            BranchId::A => BranchId::B,
            BranchId::B => BranchId::A,
        }
    }

    /// Slot index for per-identity storage
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            BranchId::A => 0,
            BranchId::B => 1,
        }
    }

    /// Short label used in reports
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BranchId::A => "A",
            BranchId::B => "B",
        }
    }
}

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execution strategy of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Both branches race, the loser is cancelled
    Speculative,
    /// Selector first, then only the winner
    Sequential,
}

impl RunMode {
    /// Label used in reports
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RunMode::Speculative => "speculative",
            RunMode::Sequential => "sequential",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value produced by a completed task
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskOutput {
    /// Primary numeric result
    pub numeric: i64,
    /// Human-readable detail
    pub detail: String,
}

impl TaskOutput {
    /// Create new output
    #[inline]
    #[must_use]
    pub fn new(numeric: i64, detail: impl Into<String>) -> Self {
        Self {
            numeric,
            detail: detail.into(),
        }
    }
}

/// Terminal state of one branch within one run
///
/// Produced exactly once per launched branch.
#[derive(Debug, Clone)]
pub struct BranchOutcome {
    /// Which branch this is
    pub branch: BranchId,
    /// Numeric result (zero when cancelled)
    pub numeric: i64,
    /// Detail text (empty when cancelled)
    pub detail: String,
    /// When the branch started executing
    pub started: Instant,
    /// When the branch reached its terminal state
    pub finished: Instant,
    /// `finished - started`
    pub duration: Duration,
    /// Whether the branch stopped on its cancellation signal
    pub cancelled: bool,
    /// Failure cause, if the task failed
    pub error: Option<String>,
}

impl BranchOutcome {
    /// Offset of the branch start from the run start
    #[inline]
    #[must_use]
    pub fn start_offset(&self, run_start: Instant) -> Duration {
        self.started.saturating_duration_since(run_start)
    }

    /// Offset of the branch end from the run start
    #[inline]
    #[must_use]
    pub fn end_offset(&self, run_start: Instant) -> Duration {
        self.finished.saturating_duration_since(run_start)
    }

    /// Whether the task failed with something other than cancellation
    #[inline]
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Selector value and how long it took to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorReading {
    /// Selector value (matrix trace for the default selector)
    pub value: i64,
    /// Time spent evaluating
    pub duration: Duration,
}

/// Record of one completed run
///
/// Never mutated after construction. Outcomes are stored in identity order
/// (`A` before `B`), whatever order they were delivered in.
#[derive(Debug, Clone)]
pub struct RunRecord {
    /// Strategy that produced this record
    pub mode: RunMode,
    /// 1-based index within the mode
    pub run_index: u32,
    /// Selector value
    pub selector_value: i64,
    /// Selector evaluation time
    pub selector_duration: Duration,
    /// Branch chosen by the selector
    pub winner: BranchId,
    /// From run start until every outcome was available
    pub total_duration: Duration,
    /// Monotonic run start
    pub run_start: Instant,
    /// Wall-clock run start
    pub started_at: DateTime<Utc>,
    /// One outcome per launched branch
    pub outcomes: Vec<BranchOutcome>,
}

impl RunRecord {
    /// Whether the given outcome belongs to the winning branch
    #[inline]
    #[must_use]
    pub fn is_winner(&self, outcome: &BranchOutcome) -> bool {
        outcome.branch == self.winner
    }

    /// Outcome for a given branch, if it was launched
    #[must_use]
    pub fn outcome(&self, branch: BranchId) -> Option<&BranchOutcome> {
        self.outcomes.iter().find(|o| o.branch == branch)
    }

    /// Outcome of the winning branch
    #[must_use]
    pub fn winning_outcome(&self) -> Option<&BranchOutcome> {
        self.outcome(self.winner)
    }
}
