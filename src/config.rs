use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_OMDB_BASE_URL: &str = "http://www.omdbapi.com/";

/// Where the document lives and how long a metadata lookup may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_path: PathBuf,
    pub provider_timeout: Duration,
}

impl StoreConfig {
    pub fn new(data_path: impl AsRef<Path>) -> Self {
        Self {
            data_path: data_path.as_ref().to_path_buf(),
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }
}

/// OMDb API settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OmdbConfig {
    pub api_key: String,
    pub base_url: String,
}

impl OmdbConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_OMDB_BASE_URL.to_string(),
        }
    }

    /// Read `OMDB_API_KEY` and, optionally, `OMDB_BASE_URL`.
    ///
    /// Returns `None` when no API key is set.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("OMDB_API_KEY").ok().filter(|k| !k.is_empty())?;
        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("OMDB_BASE_URL") {
            if !base_url.is_empty() {
                config.base_url = base_url;
            }
        }
        Some(config)
    }
}
