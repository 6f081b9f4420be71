//! Single-line prompt editor with tag suggestions
//!
//! Owns the prompt buffer and caret and forwards navigation keys to the
//! [`SuggestionController`] while suggestions are shown. Searches are not run
//! here: every edit yields a [`SearchTicket`] for the host to execute and hand
//! back through [`PromptEditor::apply_search`].

use crate::suggest::{
    KeyOutcome, SearchTicket, SuggestionController, SuggestionKey, SuggestionPopup,
    SuggestionSettings,
};
use crate::types::SearchResult;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// What the host should do after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    None,
    /// Run this search and pass the results to [`PromptEditor::apply_search`]
    Search(SearchTicket),
}

/// Prompt editor state
pub struct PromptEditor {
    text: String,
    /// Caret as a byte offset, always on a char boundary
    cursor: usize,
    controller: SuggestionController,
    popup: SuggestionPopup,
    status: String,
}

impl Default for PromptEditor {
    fn default() -> Self {
        Self::new(SuggestionSettings::default())
    }
}

impl PromptEditor {
    pub fn new(settings: SuggestionSettings) -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            controller: SuggestionController::new(settings),
            popup: SuggestionPopup::default(),
            status: String::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn controller(&self) -> &SuggestionController {
        &self.controller
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Replace the buffer, placing the caret at the end
    pub fn set_text(&mut self, text: impl Into<String>) -> EditorAction {
        self.text = text.into();
        self.cursor = self.text.len();
        self.after_edit()
    }

    /// Re-issue a search for the current caret position
    pub fn research(&mut self) -> EditorAction {
        self.after_edit()
    }

    /// The corpus became available
    ///
    /// Tickets handed out before this point could not be run, so the search
    /// for the caret position is issued again.
    pub fn corpus_loaded(&mut self, tag_count: usize) -> EditorAction {
        self.status = format!("{} tags loaded", tag_count);
        self.research()
    }

    /// Handle one key press
    pub fn handle_key(&mut self, key: KeyEvent) -> EditorAction {
        if let Some(suggestion_key) = suggestion_key(&key) {
            match self.controller.handle_key(suggestion_key, &self.text) {
                KeyOutcome::Handled => return EditorAction::None,
                KeyOutcome::Committed(commit) => {
                    self.text = commit.text;
                    self.cursor = commit.cursor;
                    self.status = format!("Inserted {}", commit.inserted);
                    return EditorAction::None;
                }
                KeyOutcome::Ignored => {}
            }
        }

        let edited = match key.code {
            KeyCode::Char(c)
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT =>
            {
                self.text.insert(self.cursor, c);
                self.cursor += c.len_utf8();
                true
            }
            KeyCode::Backspace => match self.prev_boundary() {
                Some(prev) => {
                    self.text.replace_range(prev..self.cursor, "");
                    self.cursor = prev;
                    true
                }
                None => false,
            },
            KeyCode::Delete => match self.next_boundary() {
                Some(next) => {
                    self.text.replace_range(self.cursor..next, "");
                    true
                }
                None => false,
            },
            KeyCode::Left => self.move_to(self.prev_boundary()),
            KeyCode::Right => self.move_to(self.next_boundary()),
            KeyCode::Home => self.move_to(Some(0)),
            KeyCode::End => self.move_to(Some(self.text.len())),
            KeyCode::Esc => {
                self.controller.dismiss();
                false
            }
            _ => false,
        };

        if edited {
            self.after_edit()
        } else {
            EditorAction::None
        }
    }

    /// Hand back the results of a ticket; stale ones are dropped
    pub fn apply_search(&mut self, ticket: SearchTicket, results: Vec<SearchResult>) -> bool {
        self.controller.complete_search(ticket, results)
    }

    /// Draw the prompt, the status line and the suggestion popup
    pub fn render(&mut self, frame: &mut Frame) {
        let [prompt_area, _, status_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Prompt (Ctrl+Q to quit)");
        let inner = block.inner(prompt_area);

        let caret_col = self.text[..self.cursor].chars().count() as u16;
        let scroll = caret_col.saturating_sub(inner.width.saturating_sub(1));
        frame.render_widget(
            Paragraph::new(self.text.as_str())
                .block(block)
                .scroll((0, scroll)),
            prompt_area,
        );

        let caret_x = inner.x + caret_col - scroll;
        frame.set_cursor_position((caret_x, inner.y));

        frame.render_widget(
            Paragraph::new(Line::from(self.status.as_str()))
                .style(Style::default().fg(Color::DarkGray)),
            status_area,
        );

        if self.controller.is_suggesting() {
            let area = self.popup.popup_area(
                frame.area(),
                self.controller.results().len(),
                inner.y,
                caret_x,
            );
            frame.render_widget(Clear, area);
            self.popup.render(&self.controller, area, frame.buffer_mut());
        }
    }

    fn after_edit(&mut self) -> EditorAction {
        match self.controller.begin_search(&self.text, self.cursor) {
            Some(ticket) => EditorAction::Search(ticket),
            None => EditorAction::None,
        }
    }

    fn move_to(&mut self, target: Option<usize>) -> bool {
        match target {
            Some(pos) if pos != self.cursor => {
                self.cursor = pos;
                true
            }
            _ => false,
        }
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.text[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.text[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }
}

fn suggestion_key(key: &KeyEvent) -> Option<SuggestionKey> {
    match key.code {
        KeyCode::Up => Some(SuggestionKey::Up),
        KeyCode::Down => Some(SuggestionKey::Down),
        KeyCode::Enter => Some(SuggestionKey::Enter),
        KeyCode::Tab => Some(SuggestionKey::Tab),
        KeyCode::Esc => Some(SuggestionKey::Escape),
        _ => None,
    }
}
