//! Approximate multi-keyword filename matching.
//!
//! A query is split into keywords; each keyword must approximately match the
//! filename (AND semantics) via a longest-common-subsequence pass with two
//! density rejections. Survivors score by the share of filename positions no
//! keyword claimed, lower being better.
//!
//! ## Module structure
//!
//! - `tokens` - Query tokenization and keyword ordering
//! - `lcs` - The LCS scoring pass and its reusable scratch buffers

mod lcs;
mod tokens;

pub use lcs::{score_name, MatchScratch};
pub use tokens::split_keywords;
