//! Terminal event polling

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Editor events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// Key press event
    Key(KeyEvent),

    /// Window resize event
    Resize(u16, u16),

    /// Nothing happened within the tick
    Tick,

    /// Quit requested (Ctrl+C / Ctrl+Q)
    Quit,
}

/// Event loop for the editor
pub struct EventLoop {
    /// Tick rate in milliseconds
    tick_rate: u64,
}

impl EventLoop {
    /// Create new event loop
    pub fn new(tick_rate: u64) -> Self {
        Self { tick_rate }
    }

    /// Wait up to one tick for the next event
    pub fn poll_event(&self) -> Result<EditorEvent> {
        if event::poll(Duration::from_millis(self.tick_rate))? {
            match event::read()? {
                // Release/repeat events would double every keystroke on some platforms
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if Self::is_quit_key(&key) {
                        return Ok(EditorEvent::Quit);
                    }
                    return Ok(EditorEvent::Key(key));
                }
                Event::Resize(w, h) => return Ok(EditorEvent::Resize(w, h)),
                _ => {}
            }
        }

        Ok(EditorEvent::Tick)
    }

    /// Check if key event is a quit shortcut
    pub fn is_quit_key(key: &KeyEvent) -> bool {
        matches!(
            (key.code, key.modifiers),
            (KeyCode::Char('c'), KeyModifiers::CONTROL)
                | (KeyCode::Char('q'), KeyModifiers::CONTROL)
        )
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new(50)
    }
}
