//! Settings resolution and report writing
//!
//! Run with: cargo test --package specrace-cli --test cli_tests

use specrace_cli::{command, console_summary, execute, write_report, Settings};
use specrace_report::OutputFormat;
use std::path::Path;
use tempfile::TempDir;

fn resolve(args: &[&str]) -> anyhow::Result<Settings> {
    let matches =
        command().try_get_matches_from(std::iter::once("specrace").chain(args.iter().copied()))?;
    Settings::from_matches(&matches)
}

fn quick_args(output: &Path) -> Vec<String> {
    [
        "-n", "8", "--threshold", "0", "--difficulty", "1", "--base-data", "x",
        "--primes-limit", "500", "--runs", "2", "--seed", "7", "--output",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .chain(std::iter::once(output.display().to_string()))
    .collect()
}

#[test]
fn flags_beat_file_beat_defaults() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("trial.toml");
    std::fs::write(
        &file,
        "runs = 3\nthreshold = 77\ndifficulty = 2\nformat = \"json\"\noutput = \"from-file.json\"\n",
    )
    .unwrap();
    let file = file.display().to_string();

    let settings = resolve(&["--config", &file, "--runs", "9"]).unwrap();

    assert_eq!(settings.trial.runs, 9);
    assert_eq!(settings.trial.threshold, 77);
    assert_eq!(settings.trial.difficulty, 2);
    assert_eq!(settings.trial.primes_limit, 500_000);
    assert_eq!(settings.format, OutputFormat::Json);
    assert_eq!(settings.output, Path::new("from-file.json"));
}

#[test]
fn missing_config_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.toml").display().to_string();
    let err = resolve(&["--config", &missing]).unwrap_err();
    assert!(format!("{err:#}").contains("absent.toml"));
}

#[test]
fn blank_output_from_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("trial.toml");
    std::fs::write(&file, "output = \"\"\n").unwrap();
    let file = file.display().to_string();
    assert!(resolve(&["--config", &file]).is_err());
}

#[test]
fn write_report_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a").join("b").join("metrics.csv");
    write_report(&path, "mode\n").unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "mode\n");
}

#[test]
fn execute_writes_csv_report() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("metrics.csv");
    let args = quick_args(&path);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let settings = resolve(&args).unwrap();

    let report = execute(&settings).unwrap();

    let csv = std::fs::read_to_string(&path).unwrap();
    assert!(csv.starts_with("mode,run,branch,was_winner"));
    assert!(csv.contains("\n\nsummary,"));
    assert_eq!(report.speculative.len(), 2);
    assert_eq!(report.sequential.len(), 2);

    let summary = console_summary(&report, &path);
    assert!(summary.contains("Speedup:"));
    assert!(summary.contains("metrics.csv"));
}

#[test]
fn execute_writes_json_report() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("metrics.json");
    let mut args = quick_args(&path);
    args.extend(["--format".to_string(), "json".to_string()]);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let settings = resolve(&args).unwrap();

    execute(&settings).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"session\""));
    assert!(text.contains("\"rows\""));
    assert!(text.contains("\"speedup\""));
}
