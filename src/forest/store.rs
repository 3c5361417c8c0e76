//! Forest arena: entry storage, child links, and path-cache invalidation.

use fnv::{FnvHashMap, FnvHashSet};
use thin_vec::ThinVec;

use super::ResolvedPath;
use crate::types::{FileEntry, Frn};

/// The mutable FRN forest.
///
/// The forest is private to the build side: searches only ever see the
/// immutable `IndexSnapshot`s it publishes, so mutation here never edits a
/// structure a reader holds. Every mutation bumps and returns the forest
/// version; snapshot publication is an `Arc` swap, not a deep copy.
#[derive(Debug, Default)]
pub struct Forest {
    pub(super) entries: FnvHashMap<Frn, FileEntry>,
    /// Child links derived from `parent_frn`, used to invalidate cached paths
    /// of a subtree when an ancestor changes.
    pub(super) children: FnvHashMap<Frn, ThinVec<Frn>>,
    /// Memoized resolutions, cleared per entry by invalidation.
    pub(super) paths: FnvHashMap<Frn, ResolvedPath>,
    pub(super) version: u64,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries in the forest.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the current forest version.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns the entry for `frn`, if known.
    pub fn get(&self, frn: Frn) -> Option<&FileEntry> {
        self.entries.get(&frn)
    }

    /// Registers a newly reported entry, returning the new forest version.
    ///
    /// FRNs are unique within a snapshot; a duplicate registration is treated
    /// as an update and logged.
    pub fn register(&mut self, entry: FileEntry) -> u64 {
        if self.entries.contains_key(&entry.frn) {
            log::debug!("register for known frn={} treated as update", entry.frn);
        }
        self.upsert(entry)
    }

    /// Applies a change to an existing entry (rename and/or move), returning
    /// the new forest version. An update for an unknown FRN inserts it.
    pub fn update(&mut self, entry: FileEntry) -> u64 {
        self.upsert(entry)
    }

    /// Removes an entry, returning the new forest version.
    ///
    /// Children of the removed entry become orphans; their cached paths (and
    /// those of their descendants) are invalidated so they re-resolve as
    /// their own roots.
    pub fn remove(&mut self, frn: Frn) -> u64 {
        let Some(entry) = self.entries.remove(&frn) else {
            log::debug!("remove for unknown frn={frn}");
            return self.version;
        };
        if let Some(parent) = entry.parent_frn {
            self.detach_child(parent, frn);
        }
        // Child links are kept: the kids' parent_frn still names this FRN,
        // and a later re-registration of it must be able to invalidate them
        // (same bookkeeping as a child registered before its parent).
        self.invalidate_subtree(frn);
        self.version += 1;
        self.version
    }

    fn upsert(&mut self, entry: FileEntry) -> u64 {
        let frn = entry.frn;
        let new_parent = entry.parent_frn;

        let previous = self.entries.get(&frn).map(|prev| {
            (
                prev.parent_frn,
                prev.parent_frn != new_parent || prev.name != entry.name,
            )
        });
        let stale = match previous {
            None => {
                if let Some(parent) = new_parent {
                    self.attach_child(parent, frn);
                }
                true
            }
            Some((old_parent, stale)) => {
                if old_parent != new_parent {
                    if let Some(parent) = old_parent {
                        self.detach_child(parent, frn);
                    }
                    if let Some(parent) = new_parent {
                        self.attach_child(parent, frn);
                    }
                }
                stale
            }
        };

        self.entries.insert(frn, entry);
        if stale {
            self.invalidate_subtree(frn);
        }
        self.version += 1;
        self.version
    }

    fn attach_child(&mut self, parent: Frn, child: Frn) {
        let kids = self.children.entry(parent).or_default();
        if !kids.contains(&child) {
            kids.push(child);
        }
    }

    fn detach_child(&mut self, parent: Frn, child: Frn) {
        if let Some(kids) = self.children.get_mut(&parent) {
            if let Some(pos) = kids.iter().position(|&existing| existing == child) {
                kids.remove(pos);
            }
            if kids.is_empty() {
                self.children.remove(&parent);
            }
        }
    }

    /// Drops cached paths for `frn` and every descendant reachable through
    /// child links. The visited set guards against parent-chain cycles, which
    /// show up as cycles in the child links too.
    fn invalidate_subtree(&mut self, frn: Frn) {
        let mut visited = FnvHashSet::default();
        let mut stack = vec![frn];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            self.paths.remove(&current);
            if let Some(kids) = self.children.get(&current) {
                stack.extend(kids.iter().copied());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntryFlags;

    fn entry(frn: u64, parent: Option<u64>, name: &str) -> FileEntry {
        FileEntry {
            frn: Frn::new(frn),
            parent_frn: parent.map(Frn::new),
            name: name.to_string(),
            flags: EntryFlags::empty(),
        }
    }

    #[test]
    fn mutations_bump_the_version() {
        let mut forest = Forest::new();
        assert_eq!(forest.version(), 0);
        let v1 = forest.register(entry(1, None, "root"));
        assert_eq!(v1, 1);
        let v2 = forest.update(entry(1, None, "renamed"));
        assert_eq!(v2, 2);
        let v3 = forest.remove(Frn::new(1));
        assert_eq!(v3, 3);
        assert!(forest.is_empty());
    }

    #[test]
    fn remove_unknown_frn_is_a_noop() {
        let mut forest = Forest::new();
        forest.register(entry(1, None, "root"));
        let before = forest.version();
        assert_eq!(forest.remove(Frn::new(99)), before);
        assert_eq!(forest.len(), 1);
    }

    #[test]
    fn duplicate_register_replaces_the_entry() {
        let mut forest = Forest::new();
        forest.register(entry(1, None, "first"));
        forest.register(entry(1, None, "second"));
        assert_eq!(forest.len(), 1);
        assert_eq!(forest.get(Frn::new(1)).unwrap().name, "second");
    }

    #[test]
    fn reparenting_moves_the_child_link() {
        let mut forest = Forest::new();
        forest.register(entry(1, None, "a"));
        forest.register(entry(2, None, "b"));
        forest.register(entry(3, Some(1), "kid"));
        forest.update(entry(3, Some(2), "kid"));

        assert!(forest.children.get(&Frn::new(1)).is_none());
        let kids = forest.children.get(&Frn::new(2)).unwrap();
        assert_eq!(&kids[..], &[Frn::new(3)]);
    }

    #[test]
    fn removing_a_parent_orphans_resolved_descendants() {
        let mut forest = Forest::new();
        forest.register(entry(1, None, "root"));
        forest.register(entry(2, Some(1), "dir"));
        forest.register(entry(3, Some(2), "file.txt"));
        assert_eq!(&*forest.resolve(Frn::new(3)).unwrap().path, "root\\dir\\file.txt");

        forest.remove(Frn::new(2));
        assert!(forest.get(Frn::new(2)).is_none());
        let resolved = forest.resolve(Frn::new(3)).unwrap();
        assert_eq!(&*resolved.path, "file.txt");
        assert!(!resolved.cyclic);
    }

    #[test]
    fn reregistering_a_removed_parent_reattaches_its_children() {
        let mut forest = Forest::new();
        forest.register(entry(1, None, "root"));
        forest.register(entry(2, Some(1), "kid.txt"));
        assert_eq!(&*forest.resolve(Frn::new(2)).unwrap().path, "root\\kid.txt");

        forest.remove(Frn::new(1));
        assert_eq!(&*forest.resolve(Frn::new(2)).unwrap().path, "kid.txt");

        forest.register(entry(1, None, "root2"));
        assert_eq!(&*forest.resolve(Frn::new(2)).unwrap().path, "root2\\kid.txt");
    }

    #[test]
    fn rename_invalidates_descendant_caches() {
        let mut forest = Forest::new();
        forest.register(entry(1, None, "root"));
        forest.register(entry(2, Some(1), "dir"));
        forest.register(entry(3, Some(2), "file.txt"));

        let before = forest.resolve(Frn::new(3)).unwrap();
        assert_eq!(&*before.path, "root\\dir\\file.txt");

        forest.update(entry(2, Some(1), "moved"));
        let after = forest.resolve(Frn::new(3)).unwrap();
        assert_eq!(&*after.path, "root\\moved\\file.txt");
    }
}
