//! Corpus loading with a versioned durable cache
//!
//! Cold path: fetch, parse, sort, write the cache, return. Warm path: read the
//! cache and return it untouched when its version matches. The cache only ever
//! affects speed; a broken or missing store degrades to the cold path.

use crate::config::TagConfig;
use crate::corpus::parse::parse_corpus;
use crate::corpus::source::{source_for, TagSource};
use crate::error::{Result, TagError};
use crate::search::search_tags;
use crate::storage::{CacheStore, SqliteCacheStore, CORPUS_KEY, VERSION_KEY};
use crate::types::{Corpus, SearchResult};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// How a corpus was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusOrigin {
    /// Served from the durable cache
    Cache,
    /// Fetched and parsed from the source
    Source,
}

/// Loads the corpus from its source, going through the durable cache when one is available
pub struct CorpusLoader {
    source: Arc<dyn TagSource>,
    store: Option<Arc<dyn CacheStore>>,
    version: String,
}

impl CorpusLoader {
    /// Create a loader; pass `None` as store to always load uncached
    pub fn new(
        source: Arc<dyn TagSource>,
        store: Option<Arc<dyn CacheStore>>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            source,
            store,
            version: version.into(),
        }
    }

    /// Build a loader from configuration
    ///
    /// A cache database that cannot be opened is logged and left out.
    pub async fn from_config(config: &TagConfig) -> Result<Self> {
        let source = source_for(&config.source, config.fetch_timeout)?;

        let store: Option<Arc<dyn CacheStore>> = if config.cache_enabled {
            let path = config.resolved_cache_path();
            match SqliteCacheStore::open(&path).await {
                Ok(store) => Some(Arc::new(store)),
                Err(e) => {
                    warn!(
                        "Tag cache unavailable at {} ({}), loading uncached",
                        path.display(),
                        e
                    );
                    None
                }
            }
        } else {
            None
        };

        Ok(Self::new(source, store, config.version.clone()))
    }

    /// Expected corpus version
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Cache store in use, if any
    pub fn store(&self) -> Option<&Arc<dyn CacheStore>> {
        self.store.as_ref()
    }

    /// Load the corpus
    pub async fn load(&self) -> Result<Corpus> {
        self.load_with_origin().await.map(|(corpus, _)| corpus)
    }

    /// Load the corpus, reporting whether the cache served it
    pub async fn load_with_origin(&self) -> Result<(Corpus, CorpusOrigin)> {
        if let Some(store) = &self.store {
            match self.read_cached(store.as_ref()).await {
                Ok(Some(corpus)) => {
                    info!("Loaded {} tags from cache", corpus.len());
                    return Ok((corpus, CorpusOrigin::Cache));
                }
                Ok(None) => debug!("Tag cache miss"),
                Err(e) => warn!("Tag cache read failed, loading uncached: {}", e),
            }
        }

        let corpus = self.fetch_and_parse().await?;

        if let Some(store) = &self.store {
            match self.write_cache(store.as_ref(), &corpus).await {
                Ok(()) => info!("Cached {} tags (version {})", corpus.len(), self.version),
                Err(e) => warn!("Failed to cache tags: {}", e),
            }
        }

        Ok((corpus, CorpusOrigin::Source))
    }

    /// Skip the cache, reload from source and overwrite the cache
    pub async fn refresh(&self) -> Result<Corpus> {
        let corpus = self.fetch_and_parse().await?;
        if let Some(store) = &self.store {
            self.write_cache(store.as_ref(), &corpus).await?;
        }
        Ok(corpus)
    }

    async fn fetch_and_parse(&self) -> Result<Corpus> {
        info!("Fetching and parsing tags from {}", self.source.describe());
        let bytes = self.source.fetch().await?;

        // Parsing hundreds of thousands of rows is CPU-bound
        let (corpus, report) = tokio::task::spawn_blocking(move || parse_corpus(&bytes))
            .await
            .map_err(|e| TagError::Other(format!("Parse task failed: {}", e)))??;

        debug!(
            "Parsed {} tags ({} rows skipped)",
            report.parsed, report.skipped
        );
        Ok(corpus)
    }

    async fn read_cached(&self, store: &dyn CacheStore) -> Result<Option<Corpus>> {
        // One snapshot, so the version always belongs to the corpus read with it
        let mut values = store
            .get_many(&[VERSION_KEY, CORPUS_KEY])
            .await?
            .into_iter();
        let (cached_version, bytes) = match (values.next().flatten(), values.next().flatten()) {
            (Some(version), Some(bytes)) => (version, bytes),
            _ => return Ok(None),
        };

        if cached_version != self.version.as_bytes() {
            info!(
                "Tag cache version {:?} does not match {}, reloading",
                String::from_utf8_lossy(&cached_version),
                self.version
            );
            return Ok(None);
        }

        match bincode::deserialize::<Corpus>(&bytes) {
            Ok(corpus) => Ok(Some(corpus)),
            Err(e) => {
                warn!("Cached corpus is unreadable, reloading: {}", e);
                Ok(None)
            }
        }
    }

    async fn write_cache(&self, store: &dyn CacheStore, corpus: &Corpus) -> Result<()> {
        let bytes = bincode::serialize(corpus)?;
        store
            .replace_all(vec![
                (VERSION_KEY.to_string(), self.version.as_bytes().to_vec()),
                (CORPUS_KEY.to_string(), bytes),
            ])
            .await
    }
}

/// Session-wide corpus handle
///
/// The first caller triggers the load; callers arriving while it is in flight
/// wait for that same load. A failed load leaves the handle empty so the next
/// call tries again.
pub struct TagLibrary {
    loader: CorpusLoader,
    corpus: OnceCell<Arc<Corpus>>,
}

impl TagLibrary {
    pub fn new(loader: CorpusLoader) -> Self {
        Self {
            loader,
            corpus: OnceCell::new(),
        }
    }

    /// The loaded corpus, loading it on first use
    pub async fn corpus(&self) -> Result<Arc<Corpus>> {
        self.corpus
            .get_or_try_init(|| async { self.loader.load().await.map(Arc::new) })
            .await
            .cloned()
    }

    /// Whether the corpus has been loaded
    pub fn is_loaded(&self) -> bool {
        self.corpus.initialized()
    }

    /// Search the corpus, loading it on first use
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let corpus = self.corpus().await?;
        Ok(search_tags(&corpus, query, limit))
    }

    /// Underlying loader
    pub fn loader(&self) -> &CorpusLoader {
        &self.loader
    }
}
