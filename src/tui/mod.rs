//! Terminal prompt editor
//!
//! A minimal host for the suggestion controller: a one-line prompt with the
//! popup drawn next to the caret.

mod editor;
mod events;
mod terminal;

pub use editor::{EditorAction, PromptEditor};
pub use events::{EditorEvent, EventLoop};
pub use terminal::{TerminalConfig, TerminalManager};
