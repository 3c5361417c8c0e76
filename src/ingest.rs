//! Entry ingestion interface.
//!
//! The kernel does not talk to the operating system's change journal itself;
//! it consumes an `EntrySource` that yields one full enumeration pass of raw
//! entry records. The capture mechanism behind that pass lives outside this
//! crate.

use crate::error::{Result, SearchError};
use crate::types::FileRecord;

/// A supplier of raw filesystem entries.
///
/// The baseline contract is a single full enumeration: `enumerate` returns
/// every record for the volume, in unspecified order, before the index becomes
/// ready. A failed enumeration is fatal to that build attempt; retrying is the
/// caller's decision, never the kernel's.
pub trait EntrySource {
    fn enumerate(&self) -> Result<Vec<FileRecord>>;
}

/// An in-memory source backed by a fixed record list.
///
/// Used in tests and by embedders that perform their own enumeration.
#[derive(Debug, Default, Clone)]
pub struct StaticSource {
    records: Vec<FileRecord>,
}

impl StaticSource {
    pub fn new(records: Vec<FileRecord>) -> Self {
        Self { records }
    }
}

impl EntrySource for StaticSource {
    fn enumerate(&self) -> Result<Vec<FileRecord>> {
        Ok(self.records.clone())
    }
}

/// A source that always fails, modelling an inaccessible volume or journal.
#[derive(Debug, Clone)]
pub struct UnavailableSource {
    pub reason: String,
}

impl UnavailableSource {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl EntrySource for UnavailableSource {
    fn enumerate(&self) -> Result<Vec<FileRecord>> {
        Err(SearchError::Ingestion(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_source_yields_records() {
        let source = StaticSource::new(vec![FileRecord {
            frn: 1,
            parent_frn: None,
            name: "root".to_string(),
            is_folder: true,
            is_hidden: false,
            is_system: false,
            is_normal: false,
        }]);
        let records = source.enumerate().expect("enumeration should succeed");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "root");
    }

    #[test]
    fn unavailable_source_fails() {
        let source = UnavailableSource::new("journal not mounted");
        assert!(source.enumerate().is_err());
    }
}
