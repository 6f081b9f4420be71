//! Configuration for the tag completion engine
//!
//! Where the tag table comes from, which corpus version the cache must hold,
//! and the suggestion thresholds. Loaded from TOML; every field has a default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Tag table shipped alongside the application
pub const DEFAULT_SOURCE: &str = "data/tags/danbooru_2024-12-22_pt25-ia-dd.csv";

/// Corpus version the cache must match
pub const DEFAULT_VERSION: &str = "2024-12-22";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Tag completion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TagConfig {
    /// Tag table location: a file path or an http(s) URL
    pub source: String,

    /// Expected corpus version; any other cached version is a miss
    pub version: String,

    /// Use the durable cache
    pub cache_enabled: bool,

    /// Cache database path (defaults under the local data directory)
    pub cache_path: Option<PathBuf>,

    /// Minimum token length before suggesting
    pub min_token_len: usize,

    /// Maximum number of suggestions shown
    pub result_limit: usize,

    /// Timeout for fetching a remote tag table (in seconds)
    #[serde(with = "serde_duration")]
    pub fetch_timeout: Duration,
}

// Serialize Duration as whole seconds
mod serde_duration {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            version: DEFAULT_VERSION.to_string(),
            cache_enabled: true,
            cache_path: None,
            min_token_len: 2,
            result_limit: 50,
            fetch_timeout: Duration::from_secs(30),
        }
    }
}

impl TagConfig {
    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load configuration from an optional TOML file, defaults when `None`
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Apply command-line overrides and re-validate
    pub fn with_overrides(
        mut self,
        source: Option<String>,
        cache_path: Option<PathBuf>,
        no_cache: bool,
    ) -> Result<Self, ConfigError> {
        if let Some(source) = source {
            self.source = source;
        }
        if let Some(path) = cache_path {
            self.cache_path = Some(path);
        }
        if no_cache {
            self.cache_enabled = false;
        }

        self.validate()?;
        Ok(self)
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: TagConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "source must not be empty".to_string(),
            ));
        }

        if self.version.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "version must not be empty".to_string(),
            ));
        }

        if self.min_token_len == 0 {
            return Err(ConfigError::ValidationError(
                "min_token_len must be at least 1".to_string(),
            ));
        }

        if self.result_limit == 0 || self.result_limit > 1000 {
            return Err(ConfigError::ValidationError(
                "result_limit must be between 1 and 1000".to_string(),
            ));
        }

        if self.fetch_timeout < Duration::from_secs(1) {
            return Err(ConfigError::ValidationError(
                "fetch_timeout must be at least 1 second".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to TOML file
    pub fn to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let toml_str = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    /// Cache database path, falling back to the XDG data directory
    pub fn resolved_cache_path(&self) -> PathBuf {
        self.cache_path.clone().unwrap_or_else(default_cache_path)
    }
}

/// Default cache path using XDG_DATA_HOME standard
pub fn default_cache_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tagcomplete")
        .join("tags.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TagConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_token_len, 2);
        assert_eq!(config.result_limit, 50);
        assert_eq!(config.version, "2024-12-22");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = TagConfig::from_toml(
            r#"
            source = "https://example.com/tags.csv"
            result_limit = 20
            fetch_timeout = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.source, "https://example.com/tags.csv");
        assert_eq!(config.result_limit, 20);
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
        assert_eq!(config.version, DEFAULT_VERSION);
        assert!(config.cache_enabled);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(matches!(
            TagConfig::from_toml("result_limit = 0"),
            Err(ConfigError::ValidationError(_))
        ));
        assert!(matches!(
            TagConfig::from_toml("min_token_len = 0"),
            Err(ConfigError::ValidationError(_))
        ));
        assert!(matches!(
            TagConfig::from_toml("version = \"  \""),
            Err(ConfigError::ValidationError(_))
        ));
        assert!(matches!(
            TagConfig::from_toml("result_limit = \"many\""),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tagcomplete.toml");

        let config = TagConfig {
            cache_path: Some(dir.path().join("cache.db")),
            min_token_len: 3,
            ..Default::default()
        };
        config.to_file(&path).unwrap();

        let loaded = TagConfig::from_file(&path).unwrap();
        assert_eq!(loaded.min_token_len, 3);
        assert_eq!(loaded.resolved_cache_path(), dir.path().join("cache.db"));
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let config = TagConfig::from_toml("source = \"from_file.csv\"\ncache_enabled = true\n")
            .unwrap()
            .with_overrides(
                Some("https://example.com/tags.csv".to_string()),
                Some(PathBuf::from("/tmp/tags.db")),
                true,
            )
            .unwrap();

        assert_eq!(config.source, "https://example.com/tags.csv");
        assert_eq!(config.resolved_cache_path(), PathBuf::from("/tmp/tags.db"));
        assert!(!config.cache_enabled);
    }

    #[test]
    fn test_overrides_keep_unset_values_and_validate() {
        let config = TagConfig::load(None)
            .unwrap()
            .with_overrides(None, None, false)
            .unwrap();
        assert_eq!(config.source, DEFAULT_SOURCE);
        assert!(config.cache_enabled);

        let result = TagConfig::default().with_overrides(Some("  ".to_string()), None, false);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
