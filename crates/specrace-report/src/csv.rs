//! CSV Output
//!
//! Header, one row per branch outcome, a blank line, then one summary row.

use crate::rows::{outcome_rows, OutcomeRow, SummaryRow};
use specrace_core::TrialReport;
use std::borrow::Cow;
use std::fmt::Write;

/// Column names, in order
pub const HEADER: [&str; 14] = [
    "mode",
    "run",
    "branch",
    "was_winner",
    "cancelled",
    "result_numeric",
    "result_detail",
    "condition_value",
    "condition_duration_ms",
    "branch_start_ms",
    "branch_end_ms",
    "branch_duration_ms",
    "total_duration_ms",
    "error",
];

/// Quote a field if it contains a delimiter, quote or line break
#[must_use]
pub fn escape(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn push_record<S: AsRef<str>>(out: &mut String, fields: &[S]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape(field.as_ref()));
    }
    out.push('\n');
}

fn outcome_fields(row: &OutcomeRow) -> [String; 14] {
    [
        row.mode.to_string(),
        row.run.to_string(),
        row.branch.to_string(),
        row.was_winner.to_string(),
        row.cancelled.to_string(),
        row.result_numeric.to_string(),
        row.result_detail.clone(),
        row.condition_value.to_string(),
        format!("{:.3}", row.condition_duration_ms),
        format!("{:.3}", row.branch_start_ms),
        format!("{:.3}", row.branch_end_ms),
        format!("{:.3}", row.branch_duration_ms),
        format!("{:.3}", row.total_duration_ms),
        row.error.clone().unwrap_or_default(),
    ]
}

fn summary_fields(summary: &SummaryRow) -> [String; 14] {
    let mut fields: [String; 14] = Default::default();
    fields[0] = "summary".to_string();
    fields[5] = format!(
        "avg_numeric_speculative={:.3}",
        summary.avg_numeric_speculative
    );
    fields[6] = format!(
        "avg_numeric_sequential={:.3}",
        summary.avg_numeric_sequential
    );
    let mut totals = String::new();
    let _ = write!(
        totals,
        "avg_speculative_ms={:.3};avg_sequential_ms={:.3};speedup={:.3}",
        summary.avg_speculative_ms, summary.avg_sequential_ms, summary.speedup
    );
    fields[12] = totals;
    fields
}

/// Generate the CSV report
#[must_use]
pub fn generate_csv_report(report: &TrialReport) -> String {
    let mut out = String::new();
    push_record(&mut out, &HEADER);
    for row in outcome_rows(report) {
        push_record(&mut out, &outcome_fields(&row));
    }
    out.push('\n');
    push_record(&mut out, &summary_fields(&SummaryRow::from(&report.summary)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_plain_field_borrows() {
        assert!(matches!(escape("hash=00ab"), Cow::Borrowed("hash=00ab")));
    }

    #[test]
    fn escape_quotes_delimiters() {
        assert_eq!(escape("count=4,last=7"), "\"count=4,last=7\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("a\nb"), "\"a\nb\"");
    }

    #[test]
    fn summary_row_layout() {
        let fields = summary_fields(&SummaryRow {
            runs_speculative: 2,
            runs_sequential: 2,
            avg_numeric_speculative: 1.0,
            avg_numeric_sequential: 2.5,
            avg_speculative_ms: 10.0,
            avg_sequential_ms: 15.0,
            speedup: 1.5,
        });
        assert_eq!(fields[0], "summary");
        assert_eq!(fields[5], "avg_numeric_speculative=1.000");
        assert_eq!(fields[6], "avg_numeric_sequential=2.500");
        assert_eq!(
            fields[12],
            "avg_speculative_ms=10.000;avg_sequential_ms=15.000;speedup=1.500"
        );
        assert!(fields[13].is_empty());
    }
}
