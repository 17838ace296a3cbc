//! Per-strategy averages and speedup
//!
//! Always recomputed from the full record sequence.

use crate::types::RunRecord;
use std::time::Duration;

/// Mean `total_duration`; zero for no records
#[must_use]
pub fn average_duration(records: &[RunRecord]) -> Duration {
    if records.is_empty() {
        return Duration::ZERO;
    }
    let total: u128 = records.iter().map(|r| r.total_duration.as_nanos()).sum();
    let mean = total / records.len() as u128;
    Duration::from_nanos(u64::try_from(mean).unwrap_or(u64::MAX))
}

/// Mean `numeric` over every outcome of every record, losers included
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_numeric(records: &[RunRecord]) -> f64 {
    let (sum, count) = records
        .iter()
        .flat_map(|r| r.outcomes.iter())
        .fold((0.0_f64, 0_u64), |(sum, count), o| {
            (sum + o.numeric as f64, count + 1)
        });
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// `sequential / speculative`; zero when the speculative average is zero
#[must_use]
pub fn speedup(avg_sequential: Duration, avg_speculative: Duration) -> f64 {
    if avg_speculative.is_zero() {
        return 0.0;
    }
    avg_sequential.as_secs_f64() / avg_speculative.as_secs_f64()
}

/// Averages for one strategy
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ModeSummary {
    /// Records averaged
    pub runs: usize,
    /// Mean total duration
    pub avg_total_duration: Duration,
    /// Mean numeric result over all outcomes
    pub avg_numeric: f64,
}

impl ModeSummary {
    /// Summarise one strategy's records
    #[must_use]
    pub fn from_records(records: &[RunRecord]) -> Self {
        Self {
            runs: records.len(),
            avg_total_duration: average_duration(records),
            avg_numeric: average_numeric(records),
        }
    }
}

/// Averages for both strategies and the resulting speedup
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    /// Speculative strategy
    pub speculative: ModeSummary,
    /// Sequential baseline
    pub sequential: ModeSummary,
    /// `sequential / speculative` mean total duration
    pub speedup: f64,
}

impl Summary {
    /// Summarise both record sequences
    #[must_use]
    pub fn compute(speculative: &[RunRecord], sequential: &[RunRecord]) -> Self {
        let speculative = ModeSummary::from_records(speculative);
        let sequential = ModeSummary::from_records(sequential);
        Self {
            speedup: speedup(
                sequential.avg_total_duration,
                speculative.avg_total_duration,
            ),
            speculative,
            sequential,
        }
    }
}
