//! Where the raw tag table comes from

use crate::error::{Result, TagError};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Provider of the raw tag table bytes
#[async_trait]
pub trait TagSource: Send + Sync {
    /// Fetch the whole table
    async fn fetch(&self) -> Result<Vec<u8>>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}

/// Tag table stored on the local filesystem
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TagSource for FileSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        debug!("Reading tag table from {}", self.path.display());
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| TagError::Fetch(format!("{}: {}", self.path.display(), e)))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Tag table served over HTTP(S)
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl TagSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        debug!("Downloading tag table from {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TagError::Fetch(format!("{}: HTTP {}", self.url, status)));
        }

        Ok(response.bytes().await?.to_vec())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Pick a source for a location string: http(s) URLs download, anything else is a path
pub fn source_for(location: &str, timeout: Duration) -> Result<Arc<dyn TagSource>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Arc::new(HttpSource::new(location, timeout)?))
    } else {
        Ok(Arc::new(FileSource::new(location)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_source_reads_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tags.csv");
        std::fs::write(&path, "1girl,0,100,\n").unwrap();

        let source = FileSource::new(&path);
        assert_eq!(source.fetch().await.unwrap(), b"1girl,0,100,\n".to_vec());
        assert_eq!(source.describe(), path.display().to_string());
    }

    #[tokio::test]
    async fn test_missing_file_is_fetch_error() {
        let source = FileSource::new("/definitely/not/here/tags.csv");
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, TagError::Fetch(_)));
    }

    #[test]
    fn test_source_for_location() {
        let timeout = Duration::from_secs(5);
        assert_eq!(
            source_for("https://example.com/tags.csv", timeout)
                .unwrap()
                .describe(),
            "https://example.com/tags.csv"
        );
        assert_eq!(
            source_for("data/tags.csv", timeout).unwrap().describe(),
            "data/tags.csv"
        );
    }
}
