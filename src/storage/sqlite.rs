//! SQLite cache store
//!
//! Keeps the cache in a single key/value table of an SQLite file, accessed
//! through a deadpool-sqlite connection pool so the blocking rusqlite calls run
//! off the async executor.

use crate::error::{Result, TagError};
use crate::storage::CacheStore;
use async_trait::async_trait;
use deadpool_sqlite::{Config, Pool, Runtime};
use rusqlite::OptionalExtension;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Cache store backed by an SQLite database file
pub struct SqliteCacheStore {
    pool: Pool,
    path: PathBuf,
}

impl SqliteCacheStore {
    /// Open (or create) the cache database at `db_path`
    ///
    /// Creates the parent directory and the cache table. Fails when the file
    /// cannot be created or opened, e.g. on a read-only or denied location.
    ///
    /// # Example
    /// ```ignore
    /// let store = SqliteCacheStore::open("tags.db").await?;
    /// ```
    pub async fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let path = db_path.as_ref().to_path_buf();
        info!("Opening tag cache at: {}", path.display());

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let config = Config::new(path.clone());
        let pool = config
            .create_pool(Runtime::Tokio1)
            .map_err(|e| TagError::Cache(format!("Failed to create connection pool: {}", e)))?;

        let store = Self { pool, path };
        store.create_table().await?;

        debug!("Tag cache ready");
        Ok(store)
    }

    /// Database file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn create_table(&self) -> Result<()> {
        let conn = self.connection().await?;

        conn.interact(|conn| -> Result<()> {
            conn.execute(
                "CREATE TABLE IF NOT EXISTS tag_cache (
                    key TEXT PRIMARY KEY,
                    value BLOB NOT NULL
                )",
                [],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| TagError::Cache(format!("Pool interaction failed: {}", e)))??;

        Ok(())
    }

    async fn connection(&self) -> Result<deadpool_sqlite::Object> {
        self.pool
            .get()
            .await
            .map_err(|e| TagError::Cache(format!("Failed to get connection from pool: {}", e)))
    }
}

#[async_trait]
impl CacheStore for SqliteCacheStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        debug!("Reading cache key: {}", key);

        let key = key.to_string();
        let conn = self.connection().await?;

        let value = conn
            .interact(move |conn| -> Result<Option<Vec<u8>>> {
                let value = conn
                    .query_row(
                        "SELECT value FROM tag_cache WHERE key = ?1",
                        rusqlite::params![key],
                        |row| row.get(0),
                    )
                    .optional()?;
                Ok(value)
            })
            .await
            .map_err(|e| TagError::Cache(format!("Pool interaction failed: {}", e)))??;

        Ok(value)
    }

    async fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<Vec<u8>>>> {
        debug!("Reading cache keys: {:?}", keys);

        let keys: Vec<String> = keys.iter().map(|key| key.to_string()).collect();
        let conn = self.connection().await?;

        let values = conn
            .interact(move |conn| -> Result<Vec<Option<Vec<u8>>>> {
                let tx = conn.transaction()?;
                let mut values = Vec::with_capacity(keys.len());
                {
                    let mut stmt = tx.prepare("SELECT value FROM tag_cache WHERE key = ?1")?;
                    for key in &keys {
                        values.push(
                            stmt.query_row(rusqlite::params![key], |row| row.get(0))
                                .optional()?,
                        );
                    }
                }
                tx.commit()?;
                Ok(values)
            })
            .await
            .map_err(|e| TagError::Cache(format!("Pool interaction failed: {}", e)))??;

        Ok(values)
    }

    async fn replace_all(&self, entries: Vec<(String, Vec<u8>)>) -> Result<()> {
        let count = entries.len();
        let conn = self.connection().await?;

        conn.interact(move |conn| -> Result<()> {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM tag_cache", [])?;
            for (key, value) in &entries {
                tx.execute(
                    "INSERT INTO tag_cache (key, value) VALUES (?1, ?2)",
                    rusqlite::params![key, value],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(|e| TagError::Cache(format!("Pool interaction failed: {}", e)))??;

        debug!("Replaced tag cache content with {} keys", count);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let conn = self.connection().await?;

        conn.interact(|conn| -> Result<()> {
            conn.execute("DELETE FROM tag_cache", [])?;
            Ok(())
        })
        .await
        .map_err(|e| TagError::Cache(format!("Pool interaction failed: {}", e)))??;

        info!("Tag cache cleared");
        Ok(())
    }
}
