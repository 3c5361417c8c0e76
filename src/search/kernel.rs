//! The search kernel: load states, snapshot publication, pending queries.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use parking_lot::{Mutex, RwLock};

use super::engine::rank_snapshot;
use super::SearchOutcome;
use crate::cancel::QueryVersions;
use crate::error::{Result, SearchError};
use crate::forest::Forest;
use crate::index::IndexSnapshot;
use crate::ingest::EntrySource;
use crate::matcher::split_keywords;
use crate::types::LoadState;

/// A query submitted before the index was ready. The slot holds at most one;
/// a newer submission silently replaces an older one.
#[derive(Debug)]
struct PendingQuery {
    text: String,
    version: u64,
}

/// Owns the published snapshot and orchestrates queries against it.
///
/// Thread-safe behind `Arc`: the snapshot sits in a `RwLock` and is replaced
/// wholesale on publish, load state lives in an atomic, and cancellation is
/// by supersession only (see `cancel`).
pub struct SearchKernel {
    state: AtomicU8,
    snapshot: RwLock<Arc<IndexSnapshot>>,
    versions: QueryVersions,
    pending: Mutex<Option<PendingQuery>>,
    load_error: Mutex<Option<String>>,
}

impl SearchKernel {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(LoadState::NotStarted as u8),
            snapshot: RwLock::new(Arc::new(IndexSnapshot::empty())),
            versions: QueryVersions::new(),
            pending: Mutex::new(None),
            load_error: Mutex::new(None),
        }
    }

    #[inline]
    pub fn load_state(&self) -> LoadState {
        LoadState::load(&self.state)
    }

    /// The currently published snapshot (empty before the first load).
    pub fn snapshot(&self) -> Arc<IndexSnapshot> {
        self.snapshot.read().clone()
    }

    /// Runs one full enumeration, builds the forest, and publishes the
    /// snapshot. A failed enumeration fails this build attempt; retrying is
    /// the caller's decision.
    pub fn load(&self, source: &dyn EntrySource) -> Result<()> {
        self.state.store(LoadState::Loading as u8, Ordering::SeqCst);
        let started = Instant::now();

        let records = match source.enumerate() {
            Ok(records) => records,
            Err(err) => {
                let reason = err.to_string();
                log::warn!("index build failed reason={reason}");
                *self.load_error.lock() = Some(reason.clone());
                self.state.store(LoadState::Failed as u8, Ordering::SeqCst);
                return Err(SearchError::IndexUnavailable { reason });
            }
        };

        let mut forest = Forest::new();
        for record in records {
            forest.register(record.into());
        }
        let snapshot = forest.snapshot();
        log::info!(
            "index ready entries={} version={} elapsed_ms={}",
            snapshot.len(),
            snapshot.version(),
            started.elapsed().as_millis(),
        );
        self.publish(snapshot);
        Ok(())
    }

    /// Builds the index on a background thread; queries submitted meanwhile
    /// park in the pending slot.
    pub fn spawn_load<S>(kernel: Arc<Self>, source: S) -> thread::JoinHandle<()>
    where
        S: EntrySource + Send + 'static,
    {
        thread::spawn(move || {
            if let Err(err) = kernel.load(&source) {
                log::warn!("background index build failed error={err}");
            }
        })
    }

    /// Publishes a snapshot and moves to `Ready`. Also the re-entry point
    /// for embedders that rebuild the forest themselves.
    pub fn publish(&self, snapshot: Arc<IndexSnapshot>) {
        *self.snapshot.write() = snapshot;
        *self.load_error.lock() = None;
        self.state.store(LoadState::Ready as u8, Ordering::SeqCst);
    }

    /// Submits a query. Every submission supersedes the previous one, even a
    /// blank query: clearing the input cancels an in-flight evaluation.
    pub fn search(&self, query: &str) -> SearchOutcome {
        let version = self.versions.next();
        let keywords = split_keywords(query);
        if keywords.is_empty() {
            return SearchOutcome::Ranked(Vec::new());
        }

        match self.load_state() {
            LoadState::Failed => SearchOutcome::Unavailable {
                reason: self
                    .load_error
                    .lock()
                    .clone()
                    .unwrap_or_else(|| "index build failed".to_string()),
            },
            LoadState::NotStarted | LoadState::Loading => {
                let replaced = self.pending.lock().replace(PendingQuery {
                    text: query.to_string(),
                    version,
                });
                if let Some(previous) = replaced {
                    log::debug!("pending query superseded version={}", previous.version);
                }
                SearchOutcome::Pending
            }
            LoadState::Ready => {
                let snapshot = self.snapshot();
                let token = self.versions.token(version);
                match rank_snapshot(&snapshot, &keywords, &token) {
                    Some(hits) => SearchOutcome::Ranked(hits),
                    None => SearchOutcome::Superseded,
                }
            }
        }
    }

    /// Runs the parked query, if any, once the index is ready.
    ///
    /// Returns `None` when the index is not ready or no query is parked. A
    /// parked query that was superseded while waiting reports `Superseded`;
    /// its results are never delivered.
    pub fn resolve_pending(&self) -> Option<SearchOutcome> {
        if self.load_state() != LoadState::Ready {
            return None;
        }
        let parked = self.pending.lock().take()?;
        if parked.version != self.versions.current() {
            log::debug!(
                "parked query stale version={} active={}",
                parked.version,
                self.versions.current(),
            );
            return Some(SearchOutcome::Superseded);
        }
        let keywords = split_keywords(&parked.text);
        let snapshot = self.snapshot();
        let token = self.versions.token(parked.version);
        Some(match rank_snapshot(&snapshot, &keywords, &token) {
            Some(hits) => SearchOutcome::Ranked(hits),
            None => SearchOutcome::Superseded,
        })
    }
}

impl Default for SearchKernel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{StaticSource, UnavailableSource};
    use crate::types::FileRecord;

    fn record(frn: u64, parent: Option<u64>, name: &str, folder: bool) -> FileRecord {
        FileRecord {
            frn,
            parent_frn: parent,
            name: name.to_string(),
            is_folder: folder,
            is_hidden: false,
            is_system: false,
            is_normal: !folder,
        }
    }

    fn loaded_kernel() -> SearchKernel {
        let kernel = SearchKernel::new();
        let source = StaticSource::new(vec![
            record(1, None, "C:", true),
            record(2, Some(1), "Documents", true),
            record(3, Some(2), "MyDocument2020.txt", false),
            record(4, Some(2), "2020_myfile_doc.txt", false),
            record(5, Some(2), "budget.xlsx", false),
        ]);
        kernel.load(&source).expect("load should succeed");
        kernel
    }

    fn ranked_names(outcome: SearchOutcome) -> Vec<String> {
        match outcome {
            SearchOutcome::Ranked(hits) => hits.into_iter().map(|hit| hit.name).collect(),
            other => panic!("expected ranked results, got {other:?}"),
        }
    }

    #[test]
    fn load_publishes_a_ready_snapshot() {
        let kernel = loaded_kernel();
        assert_eq!(kernel.load_state(), LoadState::Ready);
        let snapshot = kernel.snapshot();
        assert_eq!(snapshot.len(), 5);
        let doc = snapshot
            .entries()
            .iter()
            .find(|entry| entry.name == "budget.xlsx")
            .unwrap();
        assert_eq!(&*doc.path, "C:\\Documents\\budget.xlsx");
    }

    #[test]
    fn multi_keyword_query_ranks_and_excludes() {
        let kernel = loaded_kernel();
        let names = ranked_names(kernel.search("mydoc 2020"));
        assert_eq!(names, vec!["MyDocument2020.txt", "2020_myfile_doc.txt"]);
    }

    #[test]
    fn keyword_order_does_not_change_results() {
        let kernel = loaded_kernel();
        let forward = ranked_names(kernel.search("mydoc 2020"));
        let reversed = ranked_names(kernel.search("2020 mydoc"));
        assert_eq!(forward, reversed);
    }

    #[test]
    fn repeated_searches_are_idempotent() {
        let kernel = loaded_kernel();
        let first = kernel.search("doc");
        let second = kernel.search("doc");
        assert_eq!(first, second);
    }

    #[test]
    fn adding_a_keyword_never_widens_results() {
        let kernel = loaded_kernel();
        let broad = ranked_names(kernel.search("doc"));
        let narrow = ranked_names(kernel.search("doc 2020"));
        assert!(narrow.iter().all(|name| broad.contains(name)));
        assert!(narrow.len() <= broad.len());
    }

    #[test]
    fn blank_query_is_empty_in_any_state() {
        let kernel = SearchKernel::new();
        assert_eq!(kernel.search("   "), SearchOutcome::Ranked(Vec::new()));
        let kernel = loaded_kernel();
        assert_eq!(kernel.search(""), SearchOutcome::Ranked(Vec::new()));
    }

    #[test]
    fn queries_before_ready_park_and_resolve() {
        let kernel = SearchKernel::new();
        assert_eq!(kernel.search("mydoc 2020"), SearchOutcome::Pending);
        assert!(kernel.resolve_pending().is_none());

        let source = StaticSource::new(vec![
            record(1, None, "root", true),
            record(2, Some(1), "MyDocument2020.txt", false),
        ]);
        kernel.load(&source).unwrap();
        let names = ranked_names(kernel.resolve_pending().expect("a query was parked"));
        assert_eq!(names, vec!["MyDocument2020.txt"]);
        assert!(kernel.resolve_pending().is_none());
    }

    #[test]
    fn newest_parked_query_wins() {
        let kernel = SearchKernel::new();
        assert_eq!(kernel.search("first"), SearchOutcome::Pending);
        assert_eq!(kernel.search("second"), SearchOutcome::Pending);

        let source = StaticSource::new(vec![
            record(1, None, "root", true),
            record(2, Some(1), "second_draft.txt", false),
            record(3, Some(1), "first_draft.txt", false),
        ]);
        kernel.load(&source).unwrap();
        let names = ranked_names(kernel.resolve_pending().unwrap());
        assert_eq!(names, vec!["second_draft.txt"]);
    }

    #[test]
    fn superseded_parked_query_is_never_delivered() {
        let kernel = SearchKernel::new();
        assert_eq!(kernel.search("first"), SearchOutcome::Pending);
        // A later blank submission supersedes the parked query.
        assert_eq!(kernel.search(""), SearchOutcome::Ranked(Vec::new()));

        kernel.load(&StaticSource::new(vec![record(1, None, "root", true)])).unwrap();
        assert_eq!(kernel.resolve_pending(), Some(SearchOutcome::Superseded));
    }

    #[test]
    fn failed_build_makes_queries_unavailable() {
        let kernel = SearchKernel::new();
        let err = kernel
            .load(&UnavailableSource::new("journal not mounted"))
            .unwrap_err();
        assert!(matches!(err, SearchError::IndexUnavailable { .. }));
        assert_eq!(kernel.load_state(), LoadState::Failed);

        match kernel.search("anything") {
            SearchOutcome::Unavailable { reason } => {
                assert!(reason.contains("journal not mounted"));
            }
            other => panic!("expected unavailable, got {other:?}"),
        }
    }

    #[test]
    fn background_load_serves_searches_after_join() {
        let kernel = Arc::new(SearchKernel::new());
        let source = StaticSource::new(vec![
            record(1, None, "root", true),
            record(2, Some(1), "notes.txt", false),
        ]);
        SearchKernel::spawn_load(kernel.clone(), source)
            .join()
            .unwrap();
        assert_eq!(kernel.load_state(), LoadState::Ready);
        let names = ranked_names(kernel.search("notes"));
        assert_eq!(names, vec!["notes.txt"]);
    }
}
