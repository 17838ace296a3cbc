//! specrace report - trial metrics output
//!
//! Generates:
//! - CSV (one row per branch outcome, then a summary row)
//! - JSON (session metadata, rows and summary)

mod csv;
mod json;
mod rows;

pub use csv::{escape, generate_csv_report, HEADER};
pub use json::{generate_json_report, JsonReport, ReportMeta};
pub use rows::{millis, outcome_rows, OutcomeRow, SummaryRow};

use specrace_core::TrialReport;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Comma separated rows
    #[default]
    Csv,
    /// Pretty JSON document
    Json,
}

impl OutputFormat {
    /// Conventional file extension
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(ReportError::UnknownFormat(other.to_string())),
        }
    }
}

/// Report rendering errors
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Unrecognised `--format` value
    #[error("unknown output format: {0}")]
    UnknownFormat(String),

    /// JSON serialization failed
    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Render a trial in the chosen format
///
/// # Errors
/// Returns [`ReportError::Json`] if JSON serialization fails.
pub fn render(
    format: OutputFormat,
    report: &TrialReport,
    meta: &ReportMeta,
) -> Result<String, ReportError> {
    match format {
        OutputFormat::Csv => Ok(generate_csv_report(report)),
        OutputFormat::Json => Ok(generate_json_report(report, meta)?),
    }
}
