//! Ranked tag search
//!
//! Case-insensitive matching against each entry's name and aliases:
//! 1. Name starts with the query (prefix match, gets [`PREFIX_BONUS`])
//! 2. Name contains the query
//! 3. Alias string contains the query
//!
//! Score is the bonus plus popularity. Ties keep corpus order, which is already
//! popularity order, and the result is truncated only after the full sort.

use crate::types::{Corpus, SearchResult};
use std::ops::Range;

/// Score added to name-prefix matches, larger than any plausible usage count
pub const PREFIX_BONUS: u64 = 10_000_000_000;

/// Default number of suggestions
pub const DEFAULT_LIMIT: usize = 50;

/// Search the corpus for `query`, best matches first, at most `limit` results
///
/// An empty or whitespace-only query matches nothing. The alias test is a plain
/// substring test over the whole comma-joined alias string.
pub fn search_tags(corpus: &Corpus, query: &str, limit: usize) -> Vec<SearchResult> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let query = query.to_lowercase();

    // (corpus index, score, prefix)
    let mut matches: Vec<(usize, u64, bool)> = Vec::new();
    for (index, entry) in corpus.iter().enumerate() {
        let prefix = entry.lower_name().starts_with(&query);
        let matched = prefix
            || entry.lower_name().contains(&query)
            || entry.lower_aliases().contains(&query);

        if matched {
            let bonus = if prefix { PREFIX_BONUS } else { 0 };
            matches.push((index, bonus.saturating_add(entry.popularity), prefix));
        }
    }

    // Stable: equal scores keep corpus order
    matches.sort_by(|a, b| b.1.cmp(&a.1));
    matches.truncate(limit);

    matches
        .into_iter()
        .filter_map(|(index, score, prefix_match)| {
            corpus.get(index).map(|entry| SearchResult {
                entry: entry.clone(),
                score,
                prefix_match,
            })
        })
        .collect()
}

/// Byte range of the first case-insensitive occurrence of `query` in `text`
///
/// Offsets refer to `text` itself, so the range can be used to emphasise the
/// matched part of a displayed name or alias.
pub fn highlight_range(text: &str, query: &str) -> Option<Range<usize>> {
    let needle: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return None;
    }

    text.char_indices().find_map(|(start, _)| {
        match_len(&text[start..], &needle).map(|len| start..start + len)
    })
}

/// Length in bytes of the prefix of `haystack` whose lowercase form equals `needle`
fn match_len(haystack: &str, needle: &[char]) -> Option<usize> {
    let mut matched = 0;
    for (offset, ch) in haystack.char_indices() {
        if matched == needle.len() {
            return Some(offset);
        }
        for lower in ch.to_lowercase() {
            if needle.get(matched) != Some(&lower) {
                return None;
            }
            matched += 1;
        }
    }

    (matched == needle.len()).then_some(haystack.len())
}
