//! Suggestion controller
//!
//! Drives the autocomplete list for a host text editor:
//! - Every edit or caret move re-locates the token and re-runs the search
//! - Up/Down cycle the highlighted entry with wraparound
//! - Enter/Tab commit the highlighted entry, Escape dismisses
//! - Committing splices the escaped tag over the token span
//!
//! Searches may run elsewhere (e.g. a blocking thread). Each one is tagged with
//! a sequence number so a slow, stale result never replaces a newer one, and a
//! dismissal discards whatever is still in flight.

pub mod popup;

use crate::config::TagConfig;
use crate::escape::escape_tag;
use crate::search::{search_tags, DEFAULT_LIMIT};
use crate::token::get_current_token;
use crate::types::{Corpus, SearchResult, TokenSpan};
use tracing::debug;

pub use popup::SuggestionPopup;

/// Thresholds for showing suggestions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionSettings {
    /// Minimum token length (in characters) before searching
    pub min_token_len: usize,
    /// Maximum number of suggestions
    pub limit: usize,
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            min_token_len: 2,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl From<&TagConfig> for SuggestionSettings {
    fn from(config: &TagConfig) -> Self {
        Self {
            min_token_len: config.min_token_len,
            limit: config.result_limit,
        }
    }
}

/// Keys the controller reacts to while suggesting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKey {
    Up,
    Down,
    Enter,
    Tab,
    Escape,
}

/// A search the host must run and hand back through [`SuggestionController::complete_search`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    /// Sequence number, increasing per search
    pub seq: u64,
    /// Token the search is for
    pub span: TokenSpan,
}

/// Result of committing a suggestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Buffer content after the splice
    pub text: String,
    /// Caret position, right after the inserted tag
    pub cursor: usize,
    /// The escaped tag that was inserted
    pub inserted: String,
}

/// What the host should do after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not consumed; apply the key's default behaviour
    Ignored,
    /// Consumed by the suggestion list
    Handled,
    /// A suggestion was committed; replace the buffer
    Committed(Commit),
}

#[derive(Debug, Clone, Default)]
enum State {
    #[default]
    Idle,
    Suggesting {
        span: TokenSpan,
        results: Vec<SearchResult>,
        selected: usize,
    },
}

/// Suggestion state machine
#[derive(Debug, Default)]
pub struct SuggestionController {
    settings: SuggestionSettings,
    state: State,
    /// Last issued sequence number
    issued_seq: u64,
    /// Sequence number of the results on display
    displayed_seq: u64,
    /// Searches issued at or before this are discarded
    dismissed_seq: u64,
}

impl SuggestionController {
    /// Create new controller
    pub fn new(settings: SuggestionSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    pub fn settings(&self) -> SuggestionSettings {
        self.settings
    }

    /// Whether suggestions are on display
    pub fn is_suggesting(&self) -> bool {
        matches!(self.state, State::Suggesting { .. })
    }

    /// Suggestions on display (empty when idle)
    pub fn results(&self) -> &[SearchResult] {
        match &self.state {
            State::Suggesting { results, .. } => results,
            State::Idle => &[],
        }
    }

    /// Highlighted index
    pub fn selected_index(&self) -> Option<usize> {
        match &self.state {
            State::Suggesting { selected, .. } => Some(*selected),
            State::Idle => None,
        }
    }

    /// Highlighted suggestion
    pub fn selected(&self) -> Option<&SearchResult> {
        match &self.state {
            State::Suggesting {
                results, selected, ..
            } => results.get(*selected),
            State::Idle => None,
        }
    }

    /// Token the suggestions on display are for
    pub fn token(&self) -> Option<&TokenSpan> {
        match &self.state {
            State::Suggesting { span, .. } => Some(span),
            State::Idle => None,
        }
    }

    /// React to an edit or caret move with a search on the calling thread
    ///
    /// Returns whether suggestions are shown afterwards.
    pub fn refresh(&mut self, corpus: &Corpus, text: &str, cursor: usize) -> bool {
        match self.begin_search(text, cursor) {
            Some(ticket) => {
                let results = search_tags(corpus, &ticket.span.token, self.settings.limit);
                self.complete_search(ticket, results);
                self.is_suggesting()
            }
            None => false,
        }
    }

    /// React to an edit or caret move, deferring the search to the caller
    ///
    /// Hides the current list. Returns a ticket when the token at the caret
    /// is long enough to search for.
    pub fn begin_search(&mut self, text: &str, cursor: usize) -> Option<SearchTicket> {
        self.state = State::Idle;

        let span = get_current_token(text, cursor)
            .filter(|span| span.token.chars().count() >= self.settings.min_token_len);

        match span {
            Some(span) => {
                self.issued_seq += 1;
                Some(SearchTicket {
                    seq: self.issued_seq,
                    span,
                })
            }
            None => {
                // No token any more: whatever is in flight is obsolete
                self.dismissed_seq = self.issued_seq;
                None
            }
        }
    }

    /// Hand back the results of a ticket
    ///
    /// Results older than those on display, or issued before the last
    /// dismissal, are dropped. Returns whether they were accepted.
    pub fn complete_search(&mut self, ticket: SearchTicket, results: Vec<SearchResult>) -> bool {
        if ticket.seq <= self.displayed_seq || ticket.seq <= self.dismissed_seq {
            debug!("Discarding stale search #{}", ticket.seq);
            return false;
        }

        self.displayed_seq = ticket.seq;
        self.state = if results.is_empty() {
            State::Idle
        } else {
            State::Suggesting {
                span: ticket.span,
                results,
                selected: 0,
            }
        };
        true
    }

    /// Hide suggestions and drop any in-flight search
    pub fn dismiss(&mut self) {
        self.state = State::Idle;
        self.dismissed_seq = self.issued_seq;
    }

    /// Handle a navigation or commit key against the current buffer
    pub fn handle_key(&mut self, key: SuggestionKey, text: &str) -> KeyOutcome {
        let (count, selected) = match &self.state {
            State::Suggesting {
                results, selected, ..
            } => (results.len(), *selected),
            State::Idle => return KeyOutcome::Ignored,
        };

        match key {
            SuggestionKey::Down => {
                self.select((selected + 1) % count);
                KeyOutcome::Handled
            }
            SuggestionKey::Up => {
                self.select((selected + count - 1) % count);
                KeyOutcome::Handled
            }
            SuggestionKey::Escape => {
                self.dismiss();
                KeyOutcome::Handled
            }
            SuggestionKey::Enter | SuggestionKey::Tab => match self.commit(selected, text) {
                Some(commit) => KeyOutcome::Committed(commit),
                None => KeyOutcome::Ignored,
            },
        }
    }

    /// Commit the suggestion at `index` (e.g. clicked) into `text`
    ///
    /// Returns `None` and dismisses when there is no such suggestion or the
    /// token span no longer matches `text`.
    pub fn commit(&mut self, index: usize, text: &str) -> Option<Commit> {
        let state = std::mem::take(&mut self.state);
        self.dismissed_seq = self.issued_seq;

        let State::Suggesting { span, results, .. } = state else {
            return None;
        };
        let entry = &results.get(index)?.entry;

        if text.get(span.start..span.end) != Some(span.token.as_str()) {
            debug!("Token span is out of date, not committing");
            return None;
        }

        let inserted = escape_tag(&entry.name);
        let mut spliced = String::with_capacity(text.len() + inserted.len());
        spliced.push_str(&text[..span.start]);
        spliced.push_str(&inserted);
        spliced.push_str(&text[span.end..]);

        Some(Commit {
            text: spliced,
            cursor: span.start + inserted.len(),
            inserted,
        })
    }

    fn select(&mut self, index: usize) {
        if let State::Suggesting { selected, .. } = &mut self.state {
            *selected = index;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TagCategory, TagEntry};

    fn corpus() -> Corpus {
        Corpus::from_entries(vec![
            TagEntry::new("blue_eyes", TagCategory::General, 900, ""),
            TagEntry::new("blonde_hair", TagCategory::General, 800, ""),
            TagEntry::new("black_hair", TagCategory::General, 700, ""),
            TagEntry::new("uma_musume (umamusume)", TagCategory::Copyright, 50, "umamusume"),
        ])
    }

    #[test]
    fn test_short_token_stays_idle() {
        let mut controller = SuggestionController::default();
        assert!(!controller.refresh(&corpus(), "b", 1));
        assert!(!controller.is_suggesting());
        assert_eq!(controller.handle_key(SuggestionKey::Down, "b"), KeyOutcome::Ignored);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut controller = SuggestionController::default();
        let text = "masterpiece, bl";
        assert!(controller.refresh(&corpus(), text, text.len()));
        assert_eq!(controller.results().len(), 3);
        assert_eq!(controller.selected_index(), Some(0));

        controller.handle_key(SuggestionKey::Up, text);
        assert_eq!(controller.selected_index(), Some(2));
        controller.handle_key(SuggestionKey::Down, text);
        assert_eq!(controller.selected_index(), Some(0));
        controller.handle_key(SuggestionKey::Down, text);
        assert_eq!(controller.selected().unwrap().entry.name, "blonde_hair");
    }

    #[test]
    fn test_commit_splices_escaped_tag() {
        let mut controller = SuggestionController::default();
        let text = "1girl, umamu, smile";
        let cursor = text.find(", smile").unwrap();
        assert!(controller.refresh(&corpus(), text, cursor));

        let outcome = controller.handle_key(SuggestionKey::Tab, text);
        let KeyOutcome::Committed(commit) = outcome else {
            panic!("expected commit, got {:?}", outcome);
        };

        assert_eq!(commit.text, "1girl, uma_musume \\(umamusume\\), smile");
        assert_eq!(commit.inserted, "uma_musume \\(umamusume\\)");
        assert_eq!(&commit.text[..commit.cursor], "1girl, uma_musume \\(umamusume\\)");
        assert!(!controller.is_suggesting());
    }

    #[test]
    fn test_escape_dismisses() {
        let mut controller = SuggestionController::default();
        assert!(controller.refresh(&corpus(), "bl", 2));
        assert_eq!(controller.handle_key(SuggestionKey::Escape, "bl"), KeyOutcome::Handled);
        assert!(!controller.is_suggesting());
        assert_eq!(controller.handle_key(SuggestionKey::Enter, "bl"), KeyOutcome::Ignored);
    }

    #[test]
    fn test_no_matches_stays_idle() {
        let mut controller = SuggestionController::default();
        assert!(!controller.refresh(&corpus(), "zzz", 3));
        assert!(controller.token().is_none());
    }

    #[test]
    fn test_stale_search_is_discarded() {
        let corpus = corpus();
        let mut controller = SuggestionController::default();

        let first = controller.begin_search("bl", 2).unwrap();
        let second = controller.begin_search("blo", 3).unwrap();
        assert!(second.seq > first.seq);

        let fresh = search_tags(&corpus, &second.span.token, 50);
        assert!(controller.complete_search(second, fresh));

        let slow = search_tags(&corpus, &first.span.token, 50);
        assert!(!controller.complete_search(first, slow));
        assert_eq!(controller.token().unwrap().token, "blo");
        assert_eq!(controller.results().len(), 1);
    }

    #[test]
    fn test_dismiss_discards_in_flight() {
        let corpus = corpus();
        let mut controller = SuggestionController::default();

        let ticket = controller.begin_search("bl", 2).unwrap();
        controller.dismiss();

        let results = search_tags(&corpus, &ticket.span.token, 50);
        assert!(!controller.complete_search(ticket, results));
        assert!(!controller.is_suggesting());
    }

    #[test]
    fn test_commit_rejects_outdated_span() {
        let mut controller = SuggestionController::default();
        assert!(controller.refresh(&corpus(), "bl", 2));
        assert_eq!(controller.commit(0, "xy"), None);
        assert!(!controller.is_suggesting());
    }

    #[test]
    fn test_settings_from_config() {
        let config = TagConfig {
            min_token_len: 3,
            result_limit: 1,
            ..Default::default()
        };
        let mut controller = SuggestionController::new(SuggestionSettings::from(&config));

        assert!(!controller.refresh(&corpus(), "bl", 2));
        assert!(controller.refresh(&corpus(), "bla", 3));
        assert_eq!(controller.results().len(), 1);
    }
}
