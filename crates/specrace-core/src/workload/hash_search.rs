//! Brute-force digest search
//!
//! Finds the smallest counter such that `SHA-256(base_data ++ counter)`
//! starts with `difficulty` zero hex digits.

use super::POLL_INTERVAL;
use crate::cancel::{is_cancelled, CancellationToken};
use crate::task::{CancellableTask, TaskError, TaskResult};
use crate::types::TaskOutput;
use sha2::{Digest, Sha256};

/// Hex digits in a SHA-256 digest
pub const MAX_DIFFICULTY: u32 = 64;

/// Successful search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashMatch {
    /// Hex-encoded digest
    pub digest: String,
    /// Counter that produced it
    pub counter: u64,
}

/// Number of leading zero hex digits in a digest
#[must_use]
pub fn leading_zero_nibbles(digest: &[u8]) -> u32 {
    let mut count = 0;
    for byte in digest {
        if *byte == 0 {
            count += 2;
            continue;
        }
        if byte >> 4 == 0 {
            count += 1;
        }
        break;
    }
    count
}

/// Search for a digest with `difficulty` leading zero hex digits
///
/// # Errors
/// - `TaskError::Other` if `difficulty` is 0 or above [`MAX_DIFFICULTY`]
/// - `TaskError::Cancelled` if `cancel` is signalled before a match
pub fn search(
    base_data: &str,
    difficulty: u32,
    cancel: Option<&CancellationToken>,
) -> Result<HashMatch, TaskError> {
    if difficulty == 0 || difficulty > MAX_DIFFICULTY {
        return Err(TaskError::other(format!(
            "difficulty must be within 1..={MAX_DIFFICULTY} (got {difficulty})"
        )));
    }

    let mut counter: u64 = 0;
    let mut buf = String::with_capacity(base_data.len() + 20);
    loop {
        if counter % POLL_INTERVAL == 0 && is_cancelled(cancel) {
            return Err(TaskError::Cancelled);
        }

        buf.clear();
        buf.push_str(base_data);
        buf.push_str(&counter.to_string());
        let digest = Sha256::digest(buf.as_bytes());

        if leading_zero_nibbles(&digest) >= difficulty {
            return Ok(HashMatch {
                digest: hex::encode(digest),
                counter,
            });
        }

        counter = counter
            .checked_add(1)
            .ok_or_else(|| TaskError::other("counter space exhausted"))?;
    }
}

/// Branch workload wrapping [`search`]
#[derive(Debug, Clone)]
pub struct HashSearchTask {
    base_data: String,
    difficulty: u32,
}

impl HashSearchTask {
    /// Create a new search task
    #[inline]
    #[must_use]
    pub fn new(base_data: impl Into<String>, difficulty: u32) -> Self {
        Self {
            base_data: base_data.into(),
            difficulty,
        }
    }
}

impl CancellableTask for HashSearchTask {
    fn name(&self) -> &str {
        "hash-search"
    }

    fn execute(&self, cancel: Option<&CancellationToken>) -> TaskResult {
        let found = search(&self.base_data, self.difficulty, cancel)?;
        let numeric = i64::try_from(found.counter)
            .map_err(|_| TaskError::other("counter does not fit the numeric result"))?;
        Ok(TaskOutput::new(numeric, format!("hash={}", found.digest)))
    }
}
