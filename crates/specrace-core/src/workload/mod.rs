//! Heavy workloads
//!
//! Two cancellable branch tasks and the selector's matrix workload.

pub mod hash_search;
pub mod matrix_trace;
pub mod prime_count;

pub use hash_search::{HashMatch, HashSearchTask, MAX_DIFFICULTY};
pub use matrix_trace::{random_product_trace, SquareMatrix};
pub use prime_count::{PrimeCountTask, PrimeTally};

/// Elementary steps between cancellation polls
pub const POLL_INTERVAL: u64 = 1024;
