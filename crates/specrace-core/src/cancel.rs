//! One-shot cooperative cancellation
//!
//! A [`CancellationToken`] is owned by the orchestrator for the duration of
//! one run and observed by exactly one branch. Once signalled it stays
//! signalled; there is no reset.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Idempotent, non-blocking cancellation flag
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create an unsignalled token
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    ///
    /// Never blocks, whether or not the observing task ever polls.
    #[inline]
    pub fn signal(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Poll the flag
    #[inline]
    #[must_use]
    pub fn is_signalled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Poll an optional token
///
/// `None` means the caller runs to completion.
#[inline]
#[must_use]
pub fn is_cancelled(token: Option<&CancellationToken>) -> bool {
    token.is_some_and(CancellationToken::is_signalled)
}
