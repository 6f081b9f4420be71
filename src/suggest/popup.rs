//! Suggestion popup widget
//!
//! Renders the controller's suggestions as a list near the caret:
//! - Category label in the category color
//! - Tag name with the typed part emphasised
//! - Compact usage count and (truncated) aliases
//!
//! Placement is presentation only; it never affects which entry is committed.

use crate::search::highlight_range;
use crate::suggest::SuggestionController;
use crate::types::SearchResult;
use crate::utils::string::{format_count, truncate_at_char_boundary};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, StatefulWidget},
};

const MATCH_COLOR: Color = Color::Rgb(0xd9, 0xb2, 0x5c);
const ALIAS_CHARS: usize = 24;

/// Suggestion popup state
pub struct SuggestionPopup {
    /// Popup width in cells
    width: u16,

    /// Maximum rows shown before scrolling
    max_visible: usize,

    /// List widget state for rendering
    list_state: ListState,
}

impl Default for SuggestionPopup {
    fn default() -> Self {
        Self::new(56, 10)
    }
}

impl SuggestionPopup {
    pub fn new(width: u16, max_visible: usize) -> Self {
        Self {
            width,
            max_visible: max_visible.max(1),
            list_state: ListState::default(),
        }
    }

    /// Calculate popup area for `item_count` suggestions around the caret
    ///
    /// Placed on the row below the caret; flipped above it when it would run
    /// past the bottom of `viewport`; shifted left when it would run past the
    /// right edge.
    pub fn popup_area(
        &self,
        viewport: Rect,
        item_count: usize,
        caret_row: u16,
        caret_col: u16,
    ) -> Rect {
        let width = self.width.min(viewport.width);
        let height = ((item_count.min(self.max_visible) + 2) as u16).min(viewport.height);

        let max_x = viewport.right().saturating_sub(width);
        let x = caret_col.clamp(viewport.x, max_x.max(viewport.x));

        let below = caret_row.saturating_add(1);
        let y = if below.saturating_add(height) <= viewport.bottom() {
            below
        } else if caret_row >= viewport.y.saturating_add(height) {
            caret_row - height
        } else {
            viewport.bottom().saturating_sub(height).max(viewport.y)
        };

        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Render the controller's suggestions into `area`
    pub fn render(&mut self, controller: &SuggestionController, area: Rect, buf: &mut Buffer) {
        let results = controller.results();
        if results.is_empty() {
            return;
        }

        let query = controller
            .token()
            .map(|span| span.token.as_str())
            .unwrap_or_default();

        let items: Vec<ListItem> = results
            .iter()
            .map(|result| ListItem::new(suggestion_line(result, query)))
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(MATCH_COLOR))
                    .title(format!("Suggestions ({})", results.len()))
                    .style(Style::default().bg(Color::Rgb(24, 24, 24))),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::Rgb(44, 49, 58))
                    .add_modifier(Modifier::BOLD),
            );

        self.list_state.select(controller.selected_index());
        StatefulWidget::render(list, area, buf, &mut self.list_state);
    }
}

fn suggestion_line<'a>(result: &'a SearchResult, query: &str) -> Line<'a> {
    let entry = &result.entry;

    let mut spans = vec![Span::styled(
        format!("{:<10}", entry.category.label()),
        Style::default()
            .fg(entry.category.color())
            .add_modifier(Modifier::BOLD),
    )];
    spans.extend(highlighted(&entry.name, query, Style::default().fg(Color::White)));
    spans.push(Span::styled(
        format!(" {}", format_count(entry.popularity)),
        Style::default().fg(Color::DarkGray),
    ));

    if !entry.aliases.is_empty() {
        spans.push(Span::styled(
            format!("  {}", truncate_at_char_boundary(&entry.aliases, ALIAS_CHARS)),
            Style::default().fg(Color::Gray),
        ));
    }

    Line::from(spans)
}

/// Split `text` into spans, emphasising the first match of `query`
fn highlighted<'a>(text: &'a str, query: &str, base: Style) -> Vec<Span<'a>> {
    match highlight_range(text, query) {
        Some(range) => vec![
            Span::styled(&text[..range.start], base),
            Span::styled(
                &text[range.clone()],
                base.fg(MATCH_COLOR)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ),
            Span::styled(&text[range.end..], base),
        ],
        None => vec![Span::styled(text, base)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Corpus, TagCategory, TagEntry};

    fn viewport() -> Rect {
        Rect {
            x: 0,
            y: 0,
            width: 80,
            height: 24,
        }
    }

    #[test]
    fn test_popup_below_caret() {
        let popup = SuggestionPopup::new(40, 10);
        let area = popup.popup_area(viewport(), 3, 2, 10);
        assert_eq!(area, Rect { x: 10, y: 3, width: 40, height: 5 });
    }

    #[test]
    fn test_popup_flips_above_near_bottom() {
        let popup = SuggestionPopup::new(40, 10);
        let area = popup.popup_area(viewport(), 10, 20, 10);
        assert_eq!(area.height, 12);
        assert_eq!(area.y, 8);
        assert!(area.y + area.height <= 20);
    }

    #[test]
    fn test_popup_clamped_horizontally() {
        let popup = SuggestionPopup::new(40, 10);
        let area = popup.popup_area(viewport(), 3, 2, 70);
        assert_eq!(area.x, 40);
        assert!(area.right() <= 80);
    }

    #[test]
    fn test_popup_fits_tiny_viewport() {
        let popup = SuggestionPopup::new(40, 10);
        let tiny = Rect {
            x: 0,
            y: 0,
            width: 20,
            height: 6,
        };
        let area = popup.popup_area(tiny, 10, 3, 5);
        assert!(area.right() <= tiny.right());
        assert!(area.bottom() <= tiny.bottom());
    }

    #[test]
    fn test_render_lists_suggestions() {
        let corpus = Corpus::from_entries(vec![
            TagEntry::new("cat_ears", TagCategory::General, 15_000, "nekomimi"),
            TagEntry::new("cat_tail", TagCategory::General, 9_000, ""),
        ]);
        let mut controller = SuggestionController::default();
        assert!(controller.refresh(&corpus, "cat", 3));

        let area = Rect {
            x: 0,
            y: 0,
            width: 56,
            height: 4,
        };
        let mut buf = Buffer::empty(area);
        SuggestionPopup::default().render(&controller, area, &mut buf);

        let rendered: String = buf.content.iter().map(|cell| cell.symbol()).collect();
        assert!(rendered.contains("Suggestions (2)"));
        assert!(rendered.contains("cat_ears 15k"));
        assert!(rendered.contains("nekomimi"));
        assert!(rendered.contains("cat_tail 9k"));
    }

    #[test]
    fn test_render_idle_draws_nothing() {
        let area = Rect {
            x: 0,
            y: 0,
            width: 20,
            height: 4,
        };
        let mut buf = Buffer::empty(area);
        SuggestionPopup::default().render(&SuggestionController::default(), area, &mut buf);
        assert_eq!(buf, Buffer::empty(area));
    }
}
