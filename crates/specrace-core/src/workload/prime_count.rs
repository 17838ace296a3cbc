//! Prime counting by trial division

use super::POLL_INTERVAL;
use crate::cancel::{is_cancelled, CancellationToken};
use crate::task::{CancellableTask, TaskError, TaskResult};
use crate::types::TaskOutput;

/// Primes found below a limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrimeTally {
    /// How many primes were found
    pub count: u64,
    /// Largest prime found
    pub last: Option<u64>,
}

impl PrimeTally {
    /// Detail text: `count=N,last=P` or `count=0`
    #[must_use]
    pub fn detail(&self) -> String {
        match self.last {
            Some(last) => format!("count={},last={}", self.count, last),
            None => format!("count={}", self.count),
        }
    }
}

/// Largest `r` with `r * r <= n`
#[must_use]
pub fn isqrt(n: u64) -> u64 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let mut r = (n as f64).sqrt() as u64;
    while r.checked_mul(r).map_or(true, |sq| sq > n) {
        r -= 1;
    }
    while (r + 1).checked_mul(r + 1).is_some_and(|sq| sq <= n) {
        r += 1;
    }
    r
}

/// Count primes in `[2, limit)`
///
/// Each candidate is tested by trial division up to its integer square root.
/// The token is polled every [`POLL_INTERVAL`] steps, one step per candidate
/// and one per division.
///
/// # Errors
/// - `TaskError::Cancelled` if `cancel` is signalled before the count finishes
pub fn count_primes(limit: u64, cancel: Option<&CancellationToken>) -> Result<PrimeTally, TaskError> {
    let mut tally = PrimeTally::default();
    let mut steps: u64 = 0;

    let mut step = || -> Result<(), TaskError> {
        if steps % POLL_INTERVAL == 0 && is_cancelled(cancel) {
            return Err(TaskError::Cancelled);
        }
        steps = steps.wrapping_add(1);
        Ok(())
    };

    for candidate in 2..limit {
        step()?;
        let upper = isqrt(candidate);
        let mut prime = true;
        for divisor in 2..=upper {
            step()?;
            if candidate % divisor == 0 {
                prime = false;
                break;
            }
        }
        if prime {
            tally.count += 1;
            tally.last = Some(candidate);
        }
    }
    Ok(tally)
}

/// Branch workload wrapping [`count_primes`]
#[derive(Debug, Clone)]
pub struct PrimeCountTask {
    limit: u64,
}

impl PrimeCountTask {
    /// Create a new counting task over `[2, limit)`
    #[inline]
    #[must_use]
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl CancellableTask for PrimeCountTask {
    fn name(&self) -> &str {
        "prime-count"
    }

    fn execute(&self, cancel: Option<&CancellationToken>) -> TaskResult {
        let tally = count_primes(self.limit, cancel)?;
        let numeric = i64::try_from(tally.count)
            .map_err(|_| TaskError::other("prime count does not fit the numeric result"))?;
        Ok(TaskOutput::new(numeric, tally.detail()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isqrt_is_exact() {
        for n in 0..10_000u64 {
            let r = isqrt(n);
            assert!(r * r <= n, "n={n}");
            assert!((r + 1) * (r + 1) > n, "n={n}");
        }
        assert_eq!(isqrt(u64::MAX), u64::from(u32::MAX));
    }

    #[test]
    fn limit_ten_counts_four_primes() {
        let tally = count_primes(10, None).unwrap();
        assert_eq!(tally, PrimeTally { count: 4, last: Some(7) });
        assert_eq!(tally.detail(), "count=4,last=7");
    }

    #[test]
    fn limit_is_exclusive() {
        assert_eq!(count_primes(7, None).unwrap().last, Some(5));
        assert_eq!(count_primes(8, None).unwrap().last, Some(7));
    }

    #[test]
    fn small_limits_find_nothing() {
        for limit in 0..=2 {
            let tally = count_primes(limit, None).unwrap();
            assert_eq!(tally.count, 0);
            assert_eq!(tally.detail(), "count=0");
        }
    }

    #[test]
    fn matches_known_pi() {
        assert_eq!(count_primes(100, None).unwrap().count, 25);
        assert_eq!(count_primes(10_000, None).unwrap().count, 1229);
    }

    #[test]
    fn task_output_shape() {
        let out = PrimeCountTask::new(10).execute(None).unwrap();
        assert_eq!(out, TaskOutput::new(4, "count=4,last=7"));
    }

    #[test]
    fn pre_signalled_token_cancels() {
        let token = CancellationToken::new();
        token.signal();
        assert_eq!(count_primes(1_000_000, Some(&token)), Err(TaskError::Cancelled));
    }
}
