//! Client configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use cirrus_common::{Error, Result};

use crate::retry::RetryConfig;

/// Microsoft Graph v1.0 endpoint.
pub const DEFAULT_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Files larger than this are downloaded in ranges of this size.
pub const DEFAULT_CHUNK_SIZE: u64 = 10 * 1024 * 1024;

/// Configuration for the drive item client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// API base URL. Continuation links are made relative to it.
    pub base_url: String,
    /// Download chunk size and single-request threshold, in bytes.
    pub chunk_size: u64,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Retry policy for renames.
    pub retry: RetryConfig,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            user_agent: concat!("Cirrus/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 60,
            retry: RetryConfig::default(),
        }
    }
}

impl GraphConfig {
    /// Load a configuration from a JSON file. Missing fields keep their
    /// defaults.
    ///
    /// # Errors
    /// - File cannot be read
    /// - File is not valid JSON or fails validation
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let config: Self = serde_json::from_slice(&data).map_err(|e| {
            Error::InvalidInput(format!("Invalid config {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(Error::InvalidInput("Base URL cannot be empty".to_string()));
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| Error::InvalidInput(format!("Invalid base URL: {}", e)))?;
        if self.chunk_size == 0 {
            return Err(Error::InvalidInput(
                "Chunk size must be greater than zero".to_string(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::InvalidInput(
                "Retry attempts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Set the API base URL. A trailing slash is dropped.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Set the download chunk size.
    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the rename retry policy.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = GraphConfig::default();
        assert_eq!(config.base_url, "https://graph.microsoft.com/v1.0");
        assert_eq!(config.chunk_size, 10 * 1024 * 1024);
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.retry.delay(), Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"base_url": "http://127.0.0.1:8080", "retry": {{"delay_ms": 10}}}}"#
        )
        .unwrap();

        let config = GraphConfig::load(file.path()).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.retry.delay_ms, 10);
    }

    #[test]
    fn test_validation() {
        assert!(GraphConfig::default().with_chunk_size(0).validate().is_err());
        assert!(GraphConfig::default()
            .with_base_url("not a url")
            .validate()
            .is_err());
        assert!(GraphConfig::default()
            .with_retry(RetryConfig::new(0))
            .validate()
            .is_err());
    }

    #[test]
    fn test_load_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "chunk_size = 5").unwrap();
        assert!(matches!(
            GraphConfig::load(file.path()),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = GraphConfig::default().with_base_url("http://localhost:9000/v1.0/");
        assert_eq!(config.base_url, "http://localhost:9000/v1.0");
    }
}
