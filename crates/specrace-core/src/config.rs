//! Trial configuration
//!
//! Owned by the caller; validated once before any run starts.

use crate::error::ConfigError;
use crate::workload::MAX_DIFFICULTY;
use serde::{Deserialize, Serialize};

/// Parameters for a trial sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialConfig {
    /// Matrix dimension for the selector
    pub matrix_size: usize,
    /// Selector threshold: `A` wins when the trace reaches it
    pub threshold: i64,
    /// Leading zero hex digits required by the hash search
    pub difficulty: u32,
    /// Prefix hashed by the hash search
    pub base_data: String,
    /// Exclusive upper bound of the prime count
    pub primes_limit: u64,
    /// Trials per strategy
    pub runs: u32,
    /// Selector seed; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl TrialConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With matrix dimension
    #[inline]
    #[must_use]
    pub fn with_matrix_size(mut self, n: usize) -> Self {
        self.matrix_size = n;
        self
    }

    /// With selector threshold
    #[inline]
    #[must_use]
    pub fn with_threshold(mut self, threshold: i64) -> Self {
        self.threshold = threshold;
        self
    }

    /// With hash search difficulty
    #[inline]
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: u32) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// With hash search prefix
    #[inline]
    #[must_use]
    pub fn with_base_data(mut self, base_data: impl Into<String>) -> Self {
        self.base_data = base_data.into();
        self
    }

    /// With prime count limit
    #[inline]
    #[must_use]
    pub fn with_primes_limit(mut self, limit: u64) -> Self {
        self.primes_limit = limit;
        self
    }

    /// With trials per strategy
    #[inline]
    #[must_use]
    pub fn with_runs(mut self, runs: u32) -> Self {
        self.runs = runs;
        self
    }

    /// With selector seed
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Check preconditions
    ///
    /// # Errors
    /// - `ConfigError::NotPositive` for a zero size, limit or count
    /// - `ConfigError::DifficultyTooLarge` above 64 hex digits
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.matrix_size == 0 {
            return Err(ConfigError::NotPositive { field: "n" });
        }
        if self.runs == 0 {
            return Err(ConfigError::NotPositive { field: "runs" });
        }
        if self.difficulty == 0 {
            return Err(ConfigError::NotPositive {
                field: "difficulty",
            });
        }
        if self.difficulty > MAX_DIFFICULTY {
            return Err(ConfigError::DifficultyTooLarge {
                value: self.difficulty,
                max: MAX_DIFFICULTY,
            });
        }
        if self.primes_limit == 0 {
            return Err(ConfigError::NotPositive {
                field: "primes-limit",
            });
        }
        Ok(())
    }
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            matrix_size: 125,
            threshold: 500_000,
            difficulty: 5,
            base_data: "speculative".to_string(),
            primes_limit: 500_000,
            runs: 30,
            seed: None,
        }
    }
}
