//! LCS scoring pass.
//!
//! For each keyword the filename is run through a longest-common-subsequence
//! table with two rejection gates: the LCS must exceed half the keyword
//! length, and it must exceed half the span between the first and last
//! claimed filename positions. Positions claimed by any keyword are marked in
//! a flags buffer shared across the keywords of one evaluation; the final
//! figure is the count of unclaimed positions.
//!
//! The backtrack follows table values only (it takes a diagonal step whenever
//! the values line up, without re-checking the characters), and the span can
//! come out zero or negative, shifted arithmetically. Both quirks are part of
//! the scoring contract: the accepted/rejected set and the ranking depend on
//! them, so they are kept as-is.

/// Reusable buffers for one evaluation worker.
///
/// One scratch per worker thread; `evaluate` re-zeroes only the region the
/// current filename needs, so the buffers grow to the largest name seen and
/// stay there.
#[derive(Debug, Default)]
pub struct MatchScratch {
    /// Row-major (name_len + 1) x (max_keyword_len + 1) LCS table.
    table: Vec<u32>,
    stride: usize,
    /// Filename positions claimed by any keyword so far.
    flags: Vec<bool>,
    name_chars: Vec<char>,
}

impl MatchScratch {
    pub fn new() -> Self {
        Self::default()
    }

    fn prepare(&mut self, name: &str, max_keyword_len: usize) {
        self.name_chars.clear();
        self.name_chars.extend(name.chars());
        let rows = self.name_chars.len() + 1;
        self.stride = max_keyword_len + 1;

        let cells = rows * self.stride;
        if self.table.len() < cells {
            self.table.resize(cells, 0);
        }
        self.table[..cells].fill(0);

        let len = self.name_chars.len();
        if self.flags.len() < len {
            self.flags.resize(len, false);
        }
        self.flags[..len].fill(false);
    }

    /// Runs every keyword against `name`; `keywords` must be sorted ascending
    /// by length (see `split_keywords`).
    ///
    /// Returns the number of filename positions no keyword claimed, or `None`
    /// if any keyword was rejected.
    pub fn evaluate(&mut self, name: &str, keywords: &[Vec<char>]) -> Option<usize> {
        let max_keyword_len = keywords.last().map_or(0, Vec::len);
        self.prepare(name, max_keyword_len);
        let s = self.name_chars.len();
        if s == 0 && !keywords.is_empty() {
            return None;
        }

        let stride = self.stride;
        let mut result = s;
        for word in keywords {
            let w = word.len();

            // Forward pass. `first` doubles as the running best diagonal
            // value; `last` records the filename position where it occurred.
            let mut first: i64 = 0;
            let mut last: i64 = 0;
            for i in 0..s {
                let row = i * stride;
                let next = row + stride;
                for j in 0..w {
                    if self.name_chars[i] == word[j] {
                        let diag = self.table[row + j];
                        self.table[next + j + 1] = diag + 1;
                        if first < diag as i64 {
                            last = i as i64;
                            first = diag as i64;
                        }
                    } else {
                        self.table[next + j + 1] =
                            self.table[row + j + 1].max(self.table[next + j]);
                    }
                }
            }

            let lcs = self.table[s * stride + w] as i64;
            if lcs <= (w as i64) >> 1 {
                return None;
            }

            // Backtrack on table values, claiming positions; `first` becomes
            // the lowest position a diagonal step reached.
            let mut i = s;
            let mut j = w;
            while i > 0 && j > 0 {
                let here = self.table[i * stride + j];
                if self.table[(i - 1) * stride + (j - 1)] + 1 == here {
                    i -= 1;
                    j -= 1;
                    if !self.flags[i] {
                        self.flags[i] = true;
                        result -= 1;
                    }
                    first = i as i64;
                } else if self.table[(i - 1) * stride + j] == here {
                    i -= 1;
                } else {
                    j -= 1;
                }
            }

            // Span may be zero or negative; arithmetic shift, not a division.
            if lcs <= (last - first + 1) >> 1 {
                return None;
            }
        }

        Some(result)
    }

    /// Char length of the most recently evaluated name.
    #[inline]
    fn name_len(&self) -> usize {
        self.name_chars.len()
    }
}

/// Scores `name` against the keywords: `(unclaimed + 0.5) / char_len`,
/// lower is better. `None` if any keyword rejected the name.
pub fn score_name(scratch: &mut MatchScratch, name: &str, keywords: &[Vec<char>]) -> Option<f64> {
    let unclaimed = scratch.evaluate(name, keywords)?;
    Some((unclaimed as f64 + 0.5) / scratch.name_len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::split_keywords;

    fn eval(name: &str, query: &str) -> Option<usize> {
        MatchScratch::new().evaluate(name, &split_keywords(query))
    }

    #[test]
    fn exact_match_claims_every_position() {
        assert_eq!(eval("abc", "abc"), Some(0));
    }

    #[test]
    fn lcs_at_half_keyword_length_is_rejected() {
        // LCS("ab", "abcd") = 2 = 4 >> 1.
        assert_eq!(eval("ab", "abcd"), None);
        // One char longer passes the gate.
        assert!(eval("abc", "abcd").is_some());
    }

    #[test]
    fn empty_name_never_matches() {
        assert_eq!(eval("", "a"), None);
    }

    #[test]
    fn trailing_suffix_yields_a_nonpositive_span() {
        // The backtrack walks into ".txt" on table values alone, pushing
        // `first` past `last`; the signed span must not reject or underflow.
        assert_eq!(eval("MyDocument2020.txt", "2020"), Some(14));
    }

    #[test]
    fn keywords_share_one_flags_buffer() {
        // Both keywords claim the same two positions; the second pass must
        // not double-count them.
        assert_eq!(eval("xaby", "ab ab"), Some(2));
    }

    #[test]
    fn any_rejected_keyword_excludes_the_name() {
        assert_eq!(eval("budget.xlsx", "mydoc 2020"), None);
    }

    #[test]
    fn scores_rank_the_denser_match_first() {
        let keywords = split_keywords("mydoc 2020");
        let mut scratch = MatchScratch::new();
        let a = score_name(&mut scratch, "MyDocument2020.txt", &keywords).unwrap();
        let b = score_name(&mut scratch, "2020_myfile_doc.txt", &keywords).unwrap();
        assert!(a < b);
        assert!(score_name(&mut scratch, "budget.xlsx", &keywords).is_none());
    }

    #[test]
    fn scratch_reuse_matches_a_fresh_scratch() {
        let keywords = split_keywords("doc");
        let mut reused = MatchScratch::new();
        let _ = score_name(&mut reused, "MyDocument2020.txt", &keywords);
        let again = score_name(&mut reused, "docs", &keywords);
        let fresh = score_name(&mut MatchScratch::new(), "docs", &keywords);
        assert_eq!(again, fresh);
    }
}
