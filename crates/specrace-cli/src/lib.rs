//! specrace CLI
//!
//! Resolves settings (flags, then config file, then defaults), runs the
//! speculative and sequential trials, writes the metrics report and prints
//! a console summary.

pub mod config;

pub use config::FileConfig;

use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use specrace_core::{run_trials, TrialConfig, TrialReport};
use specrace_report::{millis, render, OutputFormat, ReportMeta};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Report path used when neither flag nor file names one
pub const DEFAULT_OUTPUT: &str = "metrics.csv";

/// Build the command line definition
#[must_use]
pub fn command() -> Command {
    Command::new("specrace")
        .version(specrace_core::VERSION)
        .about("Speculative execution trials: race two branches against a selector")
        .arg(
            Arg::new("n")
                .short('n')
                .value_parser(value_parser!(usize))
                .help("Matrix dimension for the selector [default: 125]"),
        )
        .arg(
            Arg::new("threshold")
                .long("threshold")
                .alias("umbral")
                .allow_negative_numbers(true)
                .value_parser(value_parser!(i64))
                .help("Selector values at or above this pick branch A [default: 500000]"),
        )
        .arg(
            Arg::new("difficulty")
                .long("difficulty")
                .value_parser(value_parser!(u32))
                .help("Leading zero hex digits required by branch A [default: 5]"),
        )
        .arg(
            Arg::new("base-data")
                .long("base-data")
                .alias("pow-data")
                .help("Hash input prefix for branch A [default: speculative]"),
        )
        .arg(
            Arg::new("primes-limit")
                .long("primes-limit")
                .value_parser(value_parser!(u64))
                .help("Count primes below this in branch B [default: 500000]"),
        )
        .arg(
            Arg::new("runs")
                .long("runs")
                .value_parser(value_parser!(u32))
                .help("Runs per strategy [default: 30]"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_parser(value_parser!(u64))
                .help("Seed for the selector matrices (OS entropy when absent)"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .alias("nombre_archivo")
                .short('o')
                .value_parser(value_parser!(PathBuf))
                .help("Report path [default: metrics.csv]"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_parser(["csv", "json"])
                .help("Report format [default: csv]"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_parser(value_parser!(PathBuf))
                .help("TOML file with trial settings"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .help("Log every run and branch"),
        )
}

/// Fully resolved settings for one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Trial parameters
    pub trial: TrialConfig,
    /// Report path
    pub output: PathBuf,
    /// Report format
    pub format: OutputFormat,
    /// Debug logging
    pub verbose: bool,
}

impl Settings {
    /// Resolve settings from parsed arguments
    ///
    /// # Errors
    /// Fails if the config file cannot be loaded, a format is unknown, the
    /// output path is blank, or the trial parameters are invalid.
    pub fn from_matches(matches: &ArgMatches) -> anyhow::Result<Self> {
        let file = match matches.get_one::<PathBuf>("config") {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        let mut trial = file.apply(TrialConfig::default());
        if let Some(&n) = matches.get_one::<usize>("n") {
            trial.matrix_size = n;
        }
        if let Some(&threshold) = matches.get_one::<i64>("threshold") {
            trial.threshold = threshold;
        }
        if let Some(&difficulty) = matches.get_one::<u32>("difficulty") {
            trial.difficulty = difficulty;
        }
        if let Some(base_data) = matches.get_one::<String>("base-data") {
            trial.base_data.clone_from(base_data);
        }
        if let Some(&limit) = matches.get_one::<u64>("primes-limit") {
            trial.primes_limit = limit;
        }
        if let Some(&runs) = matches.get_one::<u32>("runs") {
            trial.runs = runs;
        }
        if let Some(&seed) = matches.get_one::<u64>("seed") {
            trial.seed = Some(seed);
        }

        let output = matches
            .get_one::<PathBuf>("output")
            .cloned()
            .or(file.output)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
        if output.to_string_lossy().trim().is_empty() {
            bail!("output path must not be empty");
        }

        let format = match matches.get_one::<String>("format").or(file.format.as_ref()) {
            Some(name) => name.parse::<OutputFormat>()?,
            None => OutputFormat::default(),
        };

        trial.validate().context("invalid trial configuration")?;

        Ok(Self {
            trial,
            output,
            format,
            verbose: matches.get_flag("verbose"),
        })
    }
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects debug over info.
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("specrace_core={level},specrace_cli={level}"))
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Write report contents, creating parent directories as needed
///
/// # Errors
/// Fails if the directory or file cannot be written.
pub fn write_report(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Human readable summary of a finished trial
#[must_use]
pub fn console_summary(report: &TrialReport, output: &Path) -> String {
    let summary = &report.summary;
    let mut text = String::new();
    let _ = writeln!(text, "Speculative execution trials");
    let _ = writeln!(
        text,
        "  Speculative: {} runs, avg {:.3} ms",
        summary.speculative.runs,
        millis(summary.speculative.avg_total_duration)
    );
    let _ = writeln!(
        text,
        "  Sequential:  {} runs, avg {:.3} ms",
        summary.sequential.runs,
        millis(summary.sequential.avg_total_duration)
    );
    let _ = writeln!(text, "  Speedup:     {:.3}", summary.speedup);
    let _ = writeln!(text, "  Metrics:     {}", output.display());
    text
}

/// Run trials with resolved settings and write the report
///
/// # Errors
/// Fails on the first aborted run or if the report cannot be written.
pub fn execute(settings: &Settings) -> anyhow::Result<TrialReport> {
    let meta = ReportMeta::new(settings.trial.clone());
    tracing::info!(
        session = %meta.session,
        runs = settings.trial.runs,
        threshold = settings.trial.threshold,
        "starting trials"
    );

    let report = run_trials(&settings.trial).map_err(|e| {
        tracing::error!(error = %e, "trials aborted");
        e
    })?;

    let contents = render(settings.format, &report, &meta)?;
    write_report(&settings.output, &contents)?;
    tracing::info!(path = %settings.output.display(), "metrics written");
    Ok(report)
}

/// Run the CLI against the process arguments
///
/// # Errors
/// Any configuration, trial, or output failure.
pub fn run() -> anyhow::Result<()> {
    let matches = command().get_matches();
    let settings = Settings::from_matches(&matches)?;
    init_tracing(settings.verbose);

    let report = execute(&settings)?;
    print!("{}", console_summary(&report, &settings.output));
    Ok(())
}
