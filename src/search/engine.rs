//! Parallel evaluation of one query against one snapshot.

use rayon::prelude::*;

use super::SearchHit;
use crate::cancel::CancellationToken;
use crate::index::{IndexSnapshot, ResolvedEntry};
use crate::matcher::{score_name, MatchScratch};

/// Scores every entry in `snapshot` against `keywords` and returns them
/// ranked: ascending score, ties broken by ascending name.
///
/// `keywords` must be sorted ascending by length (see `split_keywords`).
/// Returns `None` when the token reports supersession; partial work is
/// discarded. Empty keywords or an empty snapshot rank to an empty list.
pub(super) fn rank_snapshot(
    snapshot: &IndexSnapshot,
    keywords: &[Vec<char>],
    token: &CancellationToken,
) -> Option<Vec<SearchHit>> {
    if keywords.is_empty() || snapshot.is_empty() {
        return Some(Vec::new());
    }

    // One scratch per worker via map_init; candidates that fail a keyword
    // or run after supersession contribute nothing.
    let mut scored: Vec<(f64, &ResolvedEntry)> = snapshot
        .entries()
        .par_iter()
        .enumerate()
        .map_init(
            MatchScratch::new,
            |scratch, (idx, entry)| -> Option<(f64, &ResolvedEntry)> {
                token.is_cancelled_sparse(idx)?;
                let score = score_name(scratch, &entry.name, keywords)?;
                Some((score, entry))
            },
        )
        .flatten()
        .collect();
    token.is_cancelled()?;

    scored.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.name.cmp(&b.1.name)));
    Some(
        scored
            .into_iter()
            .map(|(score, entry)| SearchHit {
                frn: entry.frn,
                name: entry.name.clone(),
                path: entry.path.clone(),
                flags: entry.flags,
                score,
            })
            .collect(),
    )
}
