//! Configuration loading from a TOML file
//!
//! Every key is optional. Keys present here override the built-in defaults,
//! and explicit command line flags override keys present here.
//!
//! ```toml
//! n = 64
//! threshold = 100000
//! difficulty = 4
//! base_data = "speculative"
//! primes_limit = 200000
//! runs = 10
//! seed = 42
//! output = "out/metrics.json"
//! format = "json"
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use specrace_core::TrialConfig;
use std::path::{Path, PathBuf};

/// Trial settings read from a config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Matrix dimension for the selector
    #[serde(default, alias = "matrix_size")]
    pub n: Option<usize>,
    /// Winner threshold
    #[serde(default)]
    pub threshold: Option<i64>,
    /// Leading zero hex digits for branch A
    #[serde(default)]
    pub difficulty: Option<u32>,
    /// Hash input prefix for branch A
    #[serde(default)]
    pub base_data: Option<String>,
    /// Prime count limit for branch B
    #[serde(default)]
    pub primes_limit: Option<u64>,
    /// Runs per strategy
    #[serde(default)]
    pub runs: Option<u32>,
    /// Selector RNG seed
    #[serde(default)]
    pub seed: Option<u64>,
    /// Report path
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Report format, `csv` or `json`
    #[serde(default)]
    pub format: Option<String>,
}

impl FileConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Fails if the file cannot be read or is not valid TOML for this schema.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    /// Overlay the keys present here onto `base`
    #[must_use]
    pub fn apply(&self, mut base: TrialConfig) -> TrialConfig {
        if let Some(n) = self.n {
            base.matrix_size = n;
        }
        if let Some(threshold) = self.threshold {
            base.threshold = threshold;
        }
        if let Some(difficulty) = self.difficulty {
            base.difficulty = difficulty;
        }
        if let Some(base_data) = &self.base_data {
            base.base_data.clone_from(base_data);
        }
        if let Some(limit) = self.primes_limit {
            base.primes_limit = limit;
        }
        if let Some(runs) = self.runs {
            base.runs = runs;
        }
        if self.seed.is_some() {
            base.seed = self.seed;
        }
        base
    }
}
