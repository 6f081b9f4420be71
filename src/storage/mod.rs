//! Durable cache for the tag corpus
//!
//! A versioned key-value store. The loader keeps two logical keys in it, the
//! corpus version and the serialized corpus, and always rewrites both together.

pub mod sqlite;

use crate::error::Result;
use async_trait::async_trait;

pub use sqlite::SqliteCacheStore;

/// Key holding the UTF-8 corpus version string
pub const VERSION_KEY: &str = "tags_version";

/// Key holding the bincode-serialized corpus
pub const CORPUS_KEY: &str = "tags_corpus";

/// Cache store trait defining all required operations
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read the value stored under a key
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Read several keys from one consistent snapshot
    ///
    /// Values come back in the order of `keys`. A concurrent `replace_all` is
    /// seen either entirely or not at all.
    async fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<Vec<u8>>>>;

    /// Atomically replace the whole store content with `entries`
    ///
    /// Keys not listed are removed; nothing is merged with previous content.
    async fn replace_all(&self, entries: Vec<(String, Vec<u8>)>) -> Result<()>;

    /// Remove every key
    async fn clear(&self) -> Result<()>;
}
