//! JSON Output

use crate::rows::{outcome_rows, OutcomeRow, SummaryRow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use specrace_core::{TrialConfig, TrialReport};
use ulid::Ulid;

/// Session metadata attached to a JSON report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Unique session id
    pub session: Ulid,
    /// Wall-clock start of the session
    pub started_at: DateTime<Utc>,
    /// Effective configuration
    pub config: TrialConfig,
}

impl ReportMeta {
    /// New session stamped now
    #[must_use]
    pub fn new(config: TrialConfig) -> Self {
        Self {
            session: Ulid::new(),
            started_at: Utc::now(),
            config,
        }
    }

    /// Override the start time
    #[inline]
    #[must_use]
    pub fn with_started_at(mut self, started_at: DateTime<Utc>) -> Self {
        self.started_at = started_at;
        self
    }
}

/// Full JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonReport {
    /// Session metadata
    #[serde(flatten)]
    pub meta: ReportMeta,
    /// One row per branch outcome
    pub rows: Vec<OutcomeRow>,
    /// Averages and speedup
    pub summary: SummaryRow,
}

impl JsonReport {
    /// Assemble the document for a trial
    #[must_use]
    pub fn new(report: &TrialReport, meta: ReportMeta) -> Self {
        Self {
            meta,
            rows: outcome_rows(report),
            summary: SummaryRow::from(&report.summary),
        }
    }
}

/// Generate a prettified JSON report.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn generate_json_report(
    report: &TrialReport,
    meta: &ReportMeta,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonReport::new(report, meta.clone()))
}
