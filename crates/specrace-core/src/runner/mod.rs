//! Run orchestration
//!
//! Two strategies produce the same [`RunRecord`] shape:
//! - [`SpeculativeRunner`]: both branches race while the selector runs on the
//!   calling thread; the loser is cancelled once the decision is made
//! - [`SequentialRunner`]: selector first, then only the winner
//!
//! Any branch failure other than cancellation aborts the run. No partial
//! record is produced.

mod sequential;
mod speculative;

pub use sequential::SequentialRunner;
pub use speculative::SpeculativeRunner;

use crate::error::TrialError;
use crate::selector::Selector;
use crate::types::{RunMode, RunRecord};

/// A strategy for executing one trial
pub trait RunStrategy {
    /// Which strategy this is
    fn mode(&self) -> RunMode;

    /// Execute one run
    ///
    /// # Errors
    /// Returns `TrialError` if a branch fails, panics or cannot be started.
    fn run(&self, run_index: u32, selector: &mut dyn Selector) -> Result<RunRecord, TrialError>;
}
