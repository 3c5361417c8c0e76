//! Query orchestration and parallel evaluation.
//!
//! The `SearchKernel` owns the current `IndexSnapshot`, the load-state
//! machine, and the single pending-query slot; the engine fans the matcher
//! across a snapshot's entries and merges the ranked results.
//!
//! ## Module structure
//!
//! - `engine` - Parallel per-candidate evaluation and result ordering
//! - `kernel` - `SearchKernel`: load states, pending queries, supersession

mod engine;
mod kernel;

pub use kernel::SearchKernel;

use std::sync::Arc;

use crate::types::{EntryFlags, Frn};

/// One ranked result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub frn: Frn,
    pub name: String,
    pub path: Arc<str>,
    pub flags: EntryFlags,
    /// Lower is better.
    pub score: f64,
}

/// What a submitted query produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Evaluated against the current snapshot, best match first.
    Ranked(Vec<SearchHit>),
    /// The index is still loading; the query sits in the pending slot and
    /// runs via `resolve_pending` once the index is ready.
    Pending,
    /// A newer query arrived; this one's results were discarded.
    Superseded,
    /// The index build failed; no query can be served.
    Unavailable { reason: String },
}
