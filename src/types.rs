//! Core entry types for the search kernel.
//!
//! These are the internal representations of filesystem entries. The ingestion
//! layer supplies `FileRecord`s (the serializable wire shape) which are
//! converted to `FileEntry`s before they enter the forest.

use serde::{Deserialize, Serialize};

/// A file reference number: an opaque 64-bit identifier, unique within a
/// volume and stable across renames (analogous to an inode number).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[repr(transparent)]
pub struct Frn(u64);

impl Frn {
    /// Creates an FRN from its raw value.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw 64-bit value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for Frn {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for Frn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

bitflags::bitflags! {
    /// Attribute bits reported for a filesystem entry.
    ///
    /// The bits are informative rather than mutually exclusive, except that an
    /// entry is either a folder or a file.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EntryFlags: u8 {
        const FOLDER = 0b0001;
        const HIDDEN = 0b0010;
        const SYSTEM = 0b0100;
        const NORMAL = 0b1000;
    }
}

impl EntryFlags {
    #[inline]
    pub fn is_folder(self) -> bool {
        self.contains(Self::FOLDER)
    }

    #[inline]
    pub fn is_hidden(self) -> bool {
        self.contains(Self::HIDDEN)
    }

    #[inline]
    pub fn is_system(self) -> bool {
        self.contains(Self::SYSTEM)
    }

    #[inline]
    pub fn is_normal(self) -> bool {
        self.contains(Self::NORMAL)
    }
}

/// One raw filesystem entry as reported by the ingestion layer.
///
/// Field names follow the enumeration record shape; `parent_frn` is absent for
/// volume roots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub frn: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_frn: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub is_folder: bool,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub is_system: bool,
    #[serde(default)]
    pub is_normal: bool,
}

/// An entry in the FRN forest.
///
/// `name` is the entry's own name with no path separators; the full path is
/// derived by walking parent links (see `forest`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub frn: Frn,
    pub parent_frn: Option<Frn>,
    pub name: String,
    pub flags: EntryFlags,
}

impl From<FileRecord> for FileEntry {
    fn from(record: FileRecord) -> Self {
        let mut flags = EntryFlags::empty();
        flags.set(EntryFlags::FOLDER, record.is_folder);
        flags.set(EntryFlags::HIDDEN, record.is_hidden);
        flags.set(EntryFlags::SYSTEM, record.is_system);
        flags.set(EntryFlags::NORMAL, record.is_normal);
        Self {
            frn: Frn::new(record.frn),
            parent_frn: record.parent_frn.map(Frn::new),
            name: record.name,
            flags,
        }
    }
}

/// Load state of the search kernel.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[repr(u8)]
pub enum LoadState {
    NotStarted = 0,
    Loading = 1,
    Ready = 2,
    Failed = 3,
}

impl LoadState {
    /// Loads the state from an atomic.
    pub fn load(atomic: &std::sync::atomic::AtomicU8) -> Self {
        match atomic.load(std::sync::atomic::Ordering::Relaxed) {
            1 => Self::Loading,
            2 => Self::Ready,
            3 => Self::Failed,
            _ => Self::NotStarted,
        }
    }

    /// Returns the state as a string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}
