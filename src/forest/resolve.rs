//! Path resolution and snapshot construction.
//!
//! Resolution walks parent links leaf-to-root, tracking visited FRNs for the
//! current call. A revisited FRN means the forest contains a cycle; the walk
//! terminates and every entry on it resolves as a best-effort root (its own
//! name only) rather than looping or failing the build. A missing parent is
//! expected (volume roots, entries outside the enumerated set) and silently
//! makes the entry a root.

use std::sync::Arc;
use std::time::Instant;

use fnv::FnvHashSet;

use super::{Forest, ResolvedPath, PATH_SEPARATOR};
use crate::index::{IndexSnapshot, ResolvedEntry};
use crate::types::Frn;

/// Where a resolution walk stopped.
enum WalkEnd {
    /// Reached an entry with no parent.
    Root,
    /// Reached an entry whose parent is not in the forest.
    Orphan,
    /// Revisited an FRN, directly or through an ancestor already known cyclic.
    Cycle,
    /// Reached an ancestor with a memoized non-cyclic path.
    Cached(Arc<str>),
}

impl Forest {
    /// Resolves the full path for `frn`, memoizing every entry the walk
    /// touches. Returns `None` for an unknown FRN.
    ///
    /// Amortized O(depth): each entry is computed once per invalidation and
    /// served from the cache afterwards, so a full-forest build is O(n).
    pub fn resolve(&mut self, frn: Frn) -> Option<ResolvedPath> {
        if let Some(cached) = self.paths.get(&frn) {
            return Some(cached.clone());
        }
        if !self.entries.contains_key(&frn) {
            return None;
        }

        // Walk leaf-to-root collecting the uncached chain.
        let mut chain: Vec<Frn> = Vec::new();
        let mut visited = FnvHashSet::default();
        let mut current = frn;
        let end = loop {
            visited.insert(current);
            chain.push(current);
            match self.entries[&current].parent_frn {
                None => break WalkEnd::Root,
                Some(parent) => {
                    if visited.contains(&parent) {
                        break WalkEnd::Cycle;
                    }
                    if let Some(cached) = self.paths.get(&parent) {
                        if cached.cyclic {
                            break WalkEnd::Cycle;
                        }
                        break WalkEnd::Cached(cached.path.clone());
                    }
                    if !self.entries.contains_key(&parent) {
                        break WalkEnd::Orphan;
                    }
                    current = parent;
                }
            }
        };

        match end {
            WalkEnd::Cycle => {
                log::warn!(
                    "cyclic parent chain frn={frn} chain_len={}; resolving as roots",
                    chain.len()
                );
                // Deterministic regardless of resolve order: every entry whose
                // walk touches a cycle yields its own name only.
                for &link in &chain {
                    let path: Arc<str> = Arc::from(self.entries[&link].name.as_str());
                    self.paths.insert(link, ResolvedPath { path, cyclic: true });
                }
            }
            WalkEnd::Root | WalkEnd::Orphan | WalkEnd::Cached(_) => {
                let mut parent_path = match end {
                    WalkEnd::Cached(path) => Some(path),
                    _ => None,
                };
                // Build top-down so each link extends its parent's path.
                for &link in chain.iter().rev() {
                    let name = self.entries[&link].name.as_str();
                    let path: Arc<str> = match &parent_path {
                        Some(prefix) => {
                            let mut joined =
                                String::with_capacity(prefix.len() + 1 + name.len());
                            joined.push_str(prefix);
                            joined.push(PATH_SEPARATOR);
                            joined.push_str(name);
                            Arc::from(joined.as_str())
                        }
                        None => Arc::from(name),
                    };
                    self.paths.insert(
                        link,
                        ResolvedPath {
                            path: path.clone(),
                            cyclic: false,
                        },
                    );
                    parent_path = Some(path);
                }
            }
        }

        self.paths.get(&frn).cloned()
    }

    /// Resolves every entry and publishes an immutable snapshot.
    ///
    /// Entries are ordered by ascending FRN for deterministic output; cycles
    /// and orphans are counted, never fatal.
    pub fn snapshot(&mut self) -> Arc<IndexSnapshot> {
        let started = Instant::now();
        let mut frns: Vec<Frn> = self.entries.keys().copied().collect();
        frns.sort_unstable();

        let mut resolved = Vec::with_capacity(frns.len());
        let mut cycles = 0usize;
        let mut orphans = 0usize;
        for frn in frns {
            let Some(outcome) = self.resolve(frn) else {
                continue;
            };
            let entry = &self.entries[&frn];
            if outcome.cyclic {
                cycles += 1;
            } else if let Some(parent) = entry.parent_frn {
                if !self.entries.contains_key(&parent) {
                    orphans += 1;
                }
            }
            resolved.push(ResolvedEntry {
                frn,
                name: entry.name.clone(),
                path: outcome.path,
                flags: entry.flags,
                cyclic: outcome.cyclic,
            });
        }

        log::info!(
            "forest snapshot version={} entries={} cycles={} orphans={} elapsed_ms={}",
            self.version,
            resolved.len(),
            cycles,
            orphans,
            started.elapsed().as_millis(),
        );
        Arc::new(IndexSnapshot::new(self.version, resolved, cycles, orphans))
    }
}
