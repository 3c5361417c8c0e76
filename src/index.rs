//! Immutable index snapshots.
//!
//! A snapshot is the read side of the kernel: every entry with its fully
//! resolved path, frozen at a forest version. Searches borrow a snapshot
//! behind `Arc` and never observe later mutations; publishing a new snapshot
//! is an `Arc` swap in the kernel.

use std::sync::Arc;

use crate::types::{EntryFlags, Frn};

/// One entry with its resolved full path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub frn: Frn,
    /// The entry's own name, no separators.
    pub name: String,
    /// Full path, root-to-leaf.
    pub path: Arc<str>,
    pub flags: EntryFlags,
    /// True when the entry's parent chain contained a cycle and the path
    /// degraded to the entry's own name.
    pub cyclic: bool,
}

/// An immutable, shareable view of the resolved forest.
///
/// Entries are ordered by ascending FRN.
#[derive(Debug, Default)]
pub struct IndexSnapshot {
    version: u64,
    entries: Vec<ResolvedEntry>,
    cycles: usize,
    orphans: usize,
}

impl IndexSnapshot {
    pub fn new(version: u64, entries: Vec<ResolvedEntry>, cycles: usize, orphans: usize) -> Self {
        Self {
            version,
            entries,
            cycles,
            orphans,
        }
    }

    /// An empty snapshot, the kernel's placeholder before the first load.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Forest version this snapshot was taken at.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn entries(&self) -> &[ResolvedEntry] {
        &self.entries
    }

    /// Number of entries whose parent chain contained a cycle.
    #[inline]
    pub fn cycles(&self) -> usize {
        self.cycles
    }

    /// Number of non-cyclic entries whose recorded parent was absent from the
    /// forest.
    #[inline]
    pub fn orphans(&self) -> usize {
        self.orphans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_has_no_entries() {
        let snapshot = IndexSnapshot::empty();
        assert_eq!(snapshot.version(), 0);
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.cycles(), 0);
        assert_eq!(snapshot.orphans(), 0);
    }
}
