//! Query tokenization.

/// Splits a query into keywords, each as a char sequence.
///
/// Splits on Unicode whitespace (covers the full-width space U+3000), drops
/// empty tokens, and sorts ascending by length. Evaluating the shortest
/// keyword first makes rejection cheapest: a candidate that fails the
/// shortest keyword is discarded before the longer tables are filled. The
/// sort is stable so equal-length keywords keep their query order.
pub fn split_keywords(query: &str) -> Vec<Vec<char>> {
    let mut keywords: Vec<Vec<char>> = query
        .split(char::is_whitespace)
        .filter(|token| !token.is_empty())
        .map(|token| token.chars().collect())
        .collect();
    keywords.sort_by_key(Vec::len);
    keywords
}
