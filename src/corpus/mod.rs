//! Tag corpus acquisition
//!
//! - `source`: where raw tag tables come from (file, HTTP)
//! - `parse`: tag table rows to a sorted [`Corpus`](crate::types::Corpus)
//! - `loader`: versioned caching and the session-wide single-flight handle

pub mod loader;
pub mod parse;
pub mod source;

pub use loader::{CorpusLoader, CorpusOrigin, TagLibrary};
pub use parse::{parse_corpus, ParseReport};
pub use source::{source_for, FileSource, HttpSource, TagSource};
