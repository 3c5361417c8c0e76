//! The FRN forest: parent-chain storage and full-path resolution.
//!
//! Entries arrive as a flat collection keyed by file reference number, each
//! carrying only its own name and a parent reference. This module maintains
//! that forest, resolves full paths by walking parent links (with memoization,
//! cycle detection, and orphan handling), and publishes immutable
//! `IndexSnapshot`s for the search side.
//!
//! ## Module structure
//!
//! - `store` - The `Forest` arena: register/update/remove and cache invalidation
//! - `resolve` - Path resolution and snapshot construction

mod resolve;
mod store;

pub use store::Forest;

use std::sync::Arc;

/// Separator used when concatenating path segments root-to-leaf.
pub const PATH_SEPARATOR: char = '\\';

/// The outcome of resolving one entry's full path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Full path, root-to-leaf, segments joined by `PATH_SEPARATOR`.
    pub path: Arc<str>,
    /// True when the parent chain revisited an FRN. The entry is then
    /// resolved as a best-effort root: its own name only.
    pub cyclic: bool,
}
