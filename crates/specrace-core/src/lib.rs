//! specrace core - speculative execution scheduler
//!
//! Two expensive branches start concurrently while a separate selector
//! computation decides which one is needed. The loser is cancelled
//! cooperatively. A sequential baseline (selector first, then only the
//! winner) is measured alongside to compute the speedup.
//!
//! # Example
//!
//! ```rust,no_run
//! use specrace_core::{run_trials, TrialConfig};
//!
//! let config = TrialConfig::new().with_runs(5).with_seed(Some(42));
//! let report = run_trials(&config)?;
//! println!("speedup {:.3}", report.summary.speedup);
//! # Ok::<(), specrace_core::TrialError>(())
//! ```

#![warn(unreachable_pub)]

pub mod aggregate;
pub mod branch;
pub mod cancel;
pub mod config;
pub mod error;
pub mod runner;
pub mod selector;
pub mod task;
pub mod trial;
pub mod types;
pub mod workload;

pub use aggregate::{average_duration, average_numeric, speedup, ModeSummary, Summary};
pub use branch::{execute_branch, BranchSet};
pub use cancel::CancellationToken;
pub use config::TrialConfig;
pub use error::{ConfigError, TrialError};
pub use runner::{RunStrategy, SequentialRunner, SpeculativeRunner};
pub use selector::{MatrixTraceSelector, Selector};
pub use task::{CancellableTask, TaskError, TaskResult};
pub use trial::{run_series, run_trials, run_trials_with, TrialReport};
pub use types::{BranchId, BranchOutcome, RunMode, RunRecord, SelectorReading, TaskOutput};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with specrace core
    pub use crate::{
        BranchId, BranchSet, CancellableTask, CancellationToken, RunMode, RunRecord,
        RunStrategy, Selector, SequentialRunner, SpeculativeRunner, TaskError, TaskOutput,
        TrialConfig,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
