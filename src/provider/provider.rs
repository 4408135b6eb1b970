//! Metadata provider contract

use std::time::Duration;

use async_trait::async_trait;
/// Raw metadata for one title, as returned by a provider.
///
/// Fields stay in the provider's string form; numeric coercion and
/// required-field checks happen when the store builds a `Movie`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieMetadata {
    pub imdb_id: Option<String>,
    pub title: Option<String>,
    pub director: Option<String>,
    pub year: Option<String>,
    pub imdb_rating: Option<String>,
    pub poster: Option<String>,
}

/// Transport or service failures. "Title not found" is not an error;
/// it is `Ok(None)` from [`MetadataProvider::fetch_movie_info`].
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error (status {status_code}): {message}")]
    Api { status_code: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("No response within {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Other(String),
}

/// Lookup of movie metadata by title.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch metadata for `title`.
    ///
    /// Returns `Ok(None)` when the provider knows no such title.
    async fn fetch_movie_info(&self, title: &str) -> Result<Option<MovieMetadata>, ProviderError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

#[async_trait]
impl<P: MetadataProvider + ?Sized> MetadataProvider for std::sync::Arc<P> {
    async fn fetch_movie_info(&self, title: &str) -> Result<Option<MovieMetadata>, ProviderError> {
        (**self).fetch_movie_info(title).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
