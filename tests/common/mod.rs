//! Common test utilities and helpers

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tagcomplete_core::{CacheStore, Result, TagError, TagSource};

/// Small tag table in the production column layout
pub const FIXTURE_CSV: &str = "\
1girl,0,6008646,\"1girls,sole_female\"
solo,0,5000414,alone
long_hair,0,4350743,\"longhair,long_hair_girl\"
blue_eyes,0,1796813,blue_eye
blonde_hair,0,1712321,\"blond_hair,yellow_hair,blondie\"
black_hair,0,1552339,black_hair_female
hatsune_miku,4,150000,\"miku,初音ミク\"
uma_musume,3,120000,umamusume
tokai_teio_(umamusume),4,20000,\"teio,tokai_teio\"
cat_ears,0,500,nekomimi
concatenation_tag,0,10000,
highres,5,5000000,\"high_resolution,hi_res\"
";

/// Tag source serving a fixed table and counting fetches
pub struct CountingSource {
    table: String,
    delay: Duration,
    fetches: AtomicUsize,
}

impl CountingSource {
    pub fn new(table: &str) -> Arc<Self> {
        Self::with_delay(table, Duration::ZERO)
    }

    /// Source whose fetch takes `delay`, for overlapping callers
    pub fn with_delay(table: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            table: table.to_string(),
            delay,
            fetches: AtomicUsize::new(0),
        })
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TagSource for CountingSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.table.as_bytes().to_vec())
    }

    fn describe(&self) -> String {
        "fixture".to_string()
    }
}

/// Tag source that is never reachable
pub struct UnreachableSource;

#[async_trait]
impl TagSource for UnreachableSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        Err(TagError::Fetch("connection refused".to_string()))
    }

    fn describe(&self) -> String {
        "unreachable".to_string()
    }
}

/// Cache store where every operation fails
pub struct FailingStore;

#[async_trait]
impl CacheStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Err(TagError::Cache("store unavailable".to_string()))
    }

    async fn get_many(&self, _keys: &[&str]) -> Result<Vec<Option<Vec<u8>>>> {
        Err(TagError::Cache("store unavailable".to_string()))
    }

    async fn replace_all(&self, _entries: Vec<(String, Vec<u8>)>) -> Result<()> {
        Err(TagError::Cache("store unavailable".to_string()))
    }

    async fn clear(&self) -> Result<()> {
        Err(TagError::Cache("store unavailable".to_string()))
    }
}
