//! Cancellation by supersession for search evaluation.
//!
//! There is no explicit abort API: submitting a new query bumps the active
//! version, and tokens handed to earlier evaluations start reporting
//! cancelled the next time they check.
//!
//! ## Sparse checking
//!
//! Tight loops over millions of candidates use `is_cancelled_sparse()`,
//! which only touches the atomic every 65,536 iterations.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// How often long-running loops should check whether execution was superseded.
/// A power of 2 so the modulo is a bitwise AND.
pub const CANCEL_CHECK_INTERVAL: usize = 0x10000;

/// Tracks the version of the most recently submitted query.
///
/// Call `next()` when a new query arrives; evaluations holding tokens for
/// older versions observe cancellation the next time they check.
#[derive(Debug, Default)]
pub struct QueryVersions {
    active: Arc<AtomicU64>,
}

impl QueryVersions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bumps the active version, superseding any in-flight evaluation.
    pub fn next(&self) -> u64 {
        self.active.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Returns the current active version without bumping it.
    pub fn current(&self) -> u64 {
        self.active.load(Ordering::SeqCst)
    }

    /// Creates a token bound to `version`.
    pub fn token(&self, version: u64) -> CancellationToken {
        CancellationToken {
            active: self.active.clone(),
            version,
        }
    }
}

/// A token an evaluation carries to notice that a newer query superseded it.
#[derive(Clone, Debug)]
pub struct CancellationToken {
    active: Arc<AtomicU64>,
    version: u64,
}

impl CancellationToken {
    /// A token that is never cancelled, for tests and non-interruptible work.
    pub fn noop() -> Self {
        Self {
            active: Arc::new(AtomicU64::new(0)),
            version: 0,
        }
    }

    /// Returns `Some(())` while this token's version is still the active one,
    /// `None` once superseded. Shaped for use with the `?` operator.
    #[inline]
    pub fn is_cancelled(&self) -> Option<()> {
        if self.version != self.active.load(Ordering::Relaxed) {
            None
        } else {
            Some(())
        }
    }

    /// Sparse variant of `is_cancelled` for tight loops; only performs the
    /// atomic read every `CANCEL_CHECK_INTERVAL` iterations.
    #[inline]
    pub fn is_cancelled_sparse(&self, counter: usize) -> Option<()> {
        if counter & (CANCEL_CHECK_INTERVAL - 1) == 0 {
            self.is_cancelled()
        } else {
            Some(())
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::noop()
    }
}
