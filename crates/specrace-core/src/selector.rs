//! Selector: the costly, non-cancellable decision computation
//!
//! Evaluated once per run on the orchestrating thread. Its value is mapped to
//! a winner by [`BranchId::select`](crate::types::BranchId::select).

use crate::types::SelectorReading;
use crate::workload::matrix_trace::random_product_trace;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

/// Decision computation
pub trait Selector: Send {
    /// Compute the selector value
    fn evaluate(&mut self) -> SelectorReading;
}

/// Time a selector computation
pub fn timed(compute: impl FnOnce() -> i64) -> SelectorReading {
    let start = Instant::now();
    let value = compute();
    SelectorReading {
        value,
        duration: start.elapsed(),
    }
}

/// Selector evaluating the trace of a random `n x n` matrix product
///
/// Owns its generator, so a seeded selector yields a reproducible sequence
/// of values across runs.
#[derive(Debug, Clone)]
pub struct MatrixTraceSelector {
    n: usize,
    rng: StdRng,
}

impl MatrixTraceSelector {
    /// Create with an explicit generator
    #[inline]
    #[must_use]
    pub fn new(n: usize, rng: StdRng) -> Self {
        Self { n, rng }
    }

    /// Create with a generator seeded from `seed`
    #[inline]
    #[must_use]
    pub fn seeded(n: usize, seed: u64) -> Self {
        Self::new(n, StdRng::seed_from_u64(seed))
    }

    /// Create with a generator seeded from the OS
    #[inline]
    #[must_use]
    pub fn from_entropy(n: usize) -> Self {
        Self::new(n, StdRng::from_os_rng())
    }

    /// Create from an optional seed
    #[inline]
    #[must_use]
    pub fn with_seed(n: usize, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(n, seed),
            None => Self::from_entropy(n),
        }
    }

    /// Matrix dimension
    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.n
    }
}

impl Selector for MatrixTraceSelector {
    fn evaluate(&mut self) -> SelectorReading {
        let n = self.n;
        let rng = &mut self.rng;
        timed(|| i64::try_from(random_product_trace(n, rng)).unwrap_or(i64::MAX))
    }
}
