//! Filename indexing and approximate search over an FRN forest.
//!
//! This crate provides the core of a desktop file-search tool:
//! - FRN forest storage with memoized full-path resolution
//! - Immutable index snapshots published by atomic swap
//! - LCS-based multi-keyword fuzzy matching with parallel evaluation
//! - Query orchestration with load states and supersession-based cancellation

pub mod cancel;
pub mod error;
pub mod forest;
pub mod index;
pub mod ingest;
pub mod matcher;
pub mod search;
pub mod types;

// Re-export main types
pub use cancel::CancellationToken;
pub use error::{Result, SearchError};
pub use forest::{Forest, ResolvedPath, PATH_SEPARATOR};
pub use index::{IndexSnapshot, ResolvedEntry};
pub use ingest::{EntrySource, StaticSource};
pub use search::{SearchHit, SearchKernel, SearchOutcome};
pub use types::{EntryFlags, FileEntry, FileRecord, Frn, LoadState};
