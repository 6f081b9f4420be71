//! Tagcomplete - In-context tag completion over large vocabularies
//!
//! Suggests tags from a controlled vocabulary of hundreds of thousands of
//! entries while a user types free-form prompt text:
//! - Versioned corpus loading with a durable SQLite cache
//! - Ranked prefix/substring search over names and aliases
//! - Caret-aware token location inside weighting syntax
//! - Escaping of committed tags for the prompt grammar
//!
//! # Architecture
//!
//! - **Types**: Core data structures (TagEntry, Corpus, TokenSpan, etc.)
//! - **Corpus**: Tag table sources, parsing, cached loading
//! - **Storage**: Durable cache backend (SQLite)
//! - **Suggest**: Suggestion state machine and popup widget
//! - **TUI**: Terminal plumbing for the prompt editor
//!
//! # Example
//!
//! ```ignore
//! use tagcomplete_core::{CorpusLoader, TagConfig, TagLibrary};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = TagConfig::from_file("tagcomplete.toml".as_ref())?;
//!     let library = TagLibrary::new(CorpusLoader::from_config(&config).await?);
//!
//!     for result in library.search("blu", 10).await? {
//!         println!("{} ({})", result.entry.name, result.entry.popularity);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod corpus;
pub mod error;
pub mod escape;
pub mod search;
pub mod storage;
pub mod suggest;
pub mod token;
pub mod tui;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::TagConfig;
pub use corpus::{CorpusLoader, CorpusOrigin, TagLibrary, TagSource};
pub use error::{Result, TagError};
pub use escape::escape_tag;
pub use search::search_tags;
pub use storage::{CacheStore, SqliteCacheStore};
pub use suggest::{KeyOutcome, SuggestionController, SuggestionKey, SuggestionSettings};
pub use token::get_current_token;
pub use types::{Corpus, SearchResult, TagCategory, TagEntry, TokenSpan};
