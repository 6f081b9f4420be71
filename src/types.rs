//! Core data types for the tag completion engine
//!
//! This module defines the tag vocabulary records, the loaded corpus, and the
//! ephemeral values (token spans, search results) produced while the user types.

use serde::{Deserialize, Serialize};

/// Tag category as encoded in the tag table
///
/// Codes: 0 General, 1 Artist, 3 Copyright, 4 Character, 5 Meta. Code 2 is
/// reserved and never produced by the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TagCategory {
    /// Descriptive tags (default for unknown codes)
    #[default]
    General,
    /// Artist names
    Artist,
    /// Franchises and copyrights
    Copyright,
    /// Named characters
    Character,
    /// Tags about the image itself rather than its content
    Meta,
}

impl TagCategory {
    /// Map a numeric category code to a category
    ///
    /// Unknown and reserved codes fall back to `General`.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => TagCategory::Artist,
            3 => TagCategory::Copyright,
            4 => TagCategory::Character,
            5 => TagCategory::Meta,
            _ => TagCategory::General,
        }
    }

    /// Numeric code used by the tag table
    pub fn code(&self) -> u8 {
        match self {
            TagCategory::General => 0,
            TagCategory::Artist => 1,
            TagCategory::Copyright => 3,
            TagCategory::Character => 4,
            TagCategory::Meta => 5,
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            TagCategory::General => "General",
            TagCategory::Artist => "Artist",
            TagCategory::Copyright => "Copyright",
            TagCategory::Character => "Character",
            TagCategory::Meta => "Meta",
        }
    }

    /// Badge color for the category
    pub fn color(&self) -> ratatui::style::Color {
        use ratatui::style::Color;
        match self {
            TagCategory::General => Color::Rgb(0x00, 0x9b, 0xe6),
            TagCategory::Artist => Color::Rgb(0xff, 0x8a, 0x8b),
            TagCategory::Copyright => Color::Rgb(0xc7, 0x97, 0xff),
            TagCategory::Character => Color::Rgb(0x35, 0xc6, 0x4a),
            TagCategory::Meta => Color::Rgb(0xea, 0xd0, 0x84),
        }
    }
}

impl std::fmt::Display for TagCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A single vocabulary entry
///
/// The lowercase forms are computed once in [`TagEntry::new`] and travel with
/// the entry through the durable cache, so searches never recompute them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEntry {
    /// Canonical (unescaped) tag name
    pub name: String,

    /// Tag category
    pub category: TagCategory,

    /// Usage count, drives default ordering and ranking
    pub popularity: u64,

    /// Comma-joined alternate names
    pub aliases: String,

    lower_name: String,
    lower_aliases: String,
}

impl TagEntry {
    /// Create an entry, precomputing its lowercase forms
    pub fn new(
        name: impl Into<String>,
        category: TagCategory,
        popularity: u64,
        aliases: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let aliases = aliases.into();
        let lower_name = name.to_lowercase();
        let lower_aliases = aliases.to_lowercase();

        Self {
            name,
            category,
            popularity,
            aliases,
            lower_name,
            lower_aliases,
        }
    }

    /// Lowercased name
    pub fn lower_name(&self) -> &str {
        &self.lower_name
    }

    /// Lowercased alias string
    pub fn lower_aliases(&self) -> &str {
        &self.lower_aliases
    }

    /// Individual aliases, trimmed, empty items skipped
    pub fn alias_list(&self) -> impl Iterator<Item = &str> {
        self.aliases
            .split(',')
            .map(str::trim)
            .filter(|alias| !alias.is_empty())
    }
}

/// The complete in-memory tag vocabulary, most popular first
///
/// Read-only once built; share it behind an `Arc`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    entries: Vec<TagEntry>,
}

impl Corpus {
    /// Build a corpus, sorting entries by popularity (descending)
    ///
    /// The sort is stable: entries with equal popularity keep their input order.
    pub fn from_entries(mut entries: Vec<TagEntry>) -> Self {
        entries.sort_by(|a, b| b.popularity.cmp(&a.popularity));
        Self { entries }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the corpus has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at a corpus position
    pub fn get(&self, index: usize) -> Option<&TagEntry> {
        self.entries.get(index)
    }

    /// Iterate entries in corpus order
    pub fn iter(&self) -> std::slice::Iter<'_, TagEntry> {
        self.entries.iter()
    }

    /// All entries in corpus order
    pub fn entries(&self) -> &[TagEntry] {
        &self.entries
    }
}

/// The word currently being typed
///
/// `start..end` are byte offsets into the text the span was computed from.
/// Recompute on every edit or caret move; never reuse across buffers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSpan {
    /// Token text with weighting delimiters trimmed
    pub token: String,
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

/// A ranked search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The matching entry
    pub entry: TagEntry,
    /// Ranking score (prefix bonus plus popularity)
    pub score: u64,
    /// Whether the name starts with the query
    pub prefix_match: bool,
}
