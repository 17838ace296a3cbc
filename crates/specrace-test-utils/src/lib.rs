//! Testing utilities for specrace workspace
//!
//! Stub tasks and selectors with predictable timing.

#![allow(missing_docs)]

use specrace_core::cancel::is_cancelled;
use specrace_core::selector::timed;
use specrace_core::{
    BranchSet, CancellableTask, CancellationToken, SelectorReading, Selector, TaskError,
    TaskOutput, TaskResult, TrialConfig,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Completes immediately with a fixed output
#[derive(Debug, Clone)]
pub struct FixedTask {
    pub output: TaskOutput,
}

impl FixedTask {
    pub fn new(numeric: i64, detail: &str) -> Self {
        Self {
            output: TaskOutput::new(numeric, detail),
        }
    }
}

impl CancellableTask for FixedTask {
    fn name(&self) -> &str {
        "fixed"
    }

    fn execute(&self, _cancel: Option<&CancellationToken>) -> TaskResult {
        Ok(self.output.clone())
    }
}

/// Sleeps in small steps until cancelled or until `max_steps` elapse
///
/// Completes with the number of steps taken when not cancelled.
#[derive(Debug, Clone)]
pub struct SpinTask {
    pub step: Duration,
    pub max_steps: u64,
}

impl SpinTask {
    /// Effectively unbounded: only cancellation stops it in practice
    pub fn until_cancelled() -> Self {
        Self {
            step: Duration::from_micros(100),
            max_steps: u64::MAX,
        }
    }

    /// Runs for roughly `total` unless cancelled first
    pub fn for_duration(total: Duration) -> Self {
        let step = Duration::from_micros(100);
        Self {
            step,
            max_steps: (total.as_micros() / step.as_micros()).max(1) as u64,
        }
    }
}

impl CancellableTask for SpinTask {
    fn name(&self) -> &str {
        "spin"
    }

    fn execute(&self, cancel: Option<&CancellationToken>) -> TaskResult {
        for _ in 0..self.max_steps {
            if is_cancelled(cancel) {
                return Err(TaskError::Cancelled);
            }
            thread::sleep(self.step);
        }
        Ok(TaskOutput::new(
            i64::try_from(self.max_steps).unwrap_or(i64::MAX),
            "spun",
        ))
    }
}

/// Fails with `TaskError::Other` after an optional delay
#[derive(Debug, Clone)]
pub struct FailingTask {
    pub cause: String,
    pub delay: Duration,
}

impl FailingTask {
    pub fn new(cause: &str) -> Self {
        Self {
            cause: cause.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl CancellableTask for FailingTask {
    fn name(&self) -> &str {
        "failing"
    }

    fn execute(&self, _cancel: Option<&CancellationToken>) -> TaskResult {
        thread::sleep(self.delay);
        Err(TaskError::other(self.cause.clone()))
    }
}

/// Panics instead of delivering an outcome
#[derive(Debug, Clone)]
pub struct PanickingTask {
    pub message: String,
}

impl PanickingTask {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl CancellableTask for PanickingTask {
    fn name(&self) -> &str {
        "panicking"
    }

    fn execute(&self, _cancel: Option<&CancellationToken>) -> TaskResult {
        panic!("{}", self.message);
    }
}

/// Counts executions of an inner task
#[derive(Debug, Clone)]
pub struct CountingTask<T> {
    pub inner: T,
    pub calls: Arc<AtomicUsize>,
}

impl<T> CountingTask<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<T: CancellableTask> CancellableTask for CountingTask<T> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn execute(&self, cancel: Option<&CancellationToken>) -> TaskResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.execute(cancel)
    }
}

/// Returns a fixed value after an optional delay
#[derive(Debug, Clone)]
pub struct FixedSelector {
    pub value: i64,
    pub delay: Duration,
}

impl FixedSelector {
    pub fn new(value: i64) -> Self {
        Self {
            value,
            delay: Duration::ZERO,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Selector for FixedSelector {
    fn evaluate(&mut self) -> SelectorReading {
        timed(|| {
            thread::sleep(self.delay);
            self.value
        })
    }
}

/// Replays a sequence of values, repeating the last one
#[derive(Debug, Clone)]
pub struct ScriptedSelector {
    pub values: Vec<i64>,
    pub next: usize,
}

impl ScriptedSelector {
    pub fn new(values: Vec<i64>) -> Self {
        Self { values, next: 0 }
    }
}

impl Selector for ScriptedSelector {
    fn evaluate(&mut self) -> SelectorReading {
        let idx = self.next.min(self.values.len().saturating_sub(1));
        self.next += 1;
        let value = self.values.get(idx).copied().unwrap_or_default();
        timed(|| value)
    }
}

/// Branch pair from two tasks
pub fn branch_set<A, B>(a: A, b: B) -> BranchSet
where
    A: CancellableTask + 'static,
    B: CancellableTask + 'static,
{
    BranchSet::new(Box::new(a), Box::new(b))
}

/// Configuration whose real workloads finish in milliseconds
pub fn quick_config() -> TrialConfig {
    TrialConfig::new()
        .with_matrix_size(8)
        .with_threshold(0)
        .with_difficulty(1)
        .with_base_data("x")
        .with_primes_limit(500)
        .with_runs(2)
        .with_seed(Some(7))
}
