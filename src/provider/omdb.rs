//! OMDb metadata provider adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::provider::{MetadataProvider, MovieMetadata, ProviderError};
use crate::config::OmdbConfig;

/// Lookup-by-title response body of the OMDb API.
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbResponse {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "Director", default)]
    pub director: Option<String>,
    #[serde(rename = "Year", default)]
    pub year: Option<String>,
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: Option<String>,
    #[serde(rename = "imdbID", default)]
    pub imdb_id: Option<String>,
    #[serde(rename = "Poster", default)]
    pub poster: Option<String>,
}

impl OmdbResponse {
    /// Decode a response body; anything that is not an OMDb lookup
    /// result is a [`ProviderError::Decode`].
    pub fn from_body(body: &str) -> Result<Self, ProviderError> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn found(&self) -> bool {
        self.response == "True"
    }

    /// `None` when OMDb answered `"Response": "False"`.
    pub fn into_metadata(self) -> Option<MovieMetadata> {
        if !self.found() {
            return None;
        }
        Some(MovieMetadata {
            imdb_id: self.imdb_id,
            title: self.title,
            director: self.director,
            year: self.year,
            imdb_rating: self.imdb_rating,
            poster: self.poster,
        })
    }
}

pub struct OmdbClient {
    client: Client,
    config: OmdbConfig,
}

impl OmdbClient {
    pub fn new(config: OmdbConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Use a prebuilt reqwest client (proxies, custom TLS, ...).
    pub fn with_client(client: Client, config: OmdbConfig) -> Self {
        Self { client, config }
    }

    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> Result<OmdbResponse, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status_code: status.as_u16(),
                message,
            });
        }
        let body = response.text().await?;
        OmdbResponse::from_body(&body)
    }
}

#[async_trait]
impl MetadataProvider for OmdbClient {
    async fn fetch_movie_info(&self, title: &str) -> Result<Option<MovieMetadata>, ProviderError> {
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[("apikey", self.config.api_key.as_str()), ("t", title)])
            .send()
            .await?;

        let body = self.handle_response(response).await?;
        if !body.found() {
            tracing::debug!(
                "OMDb has no match for '{}': {}",
                title,
                body.error.as_deref().unwrap_or("no error message")
            );
        }
        Ok(body.into_metadata())
    }

    fn name(&self) -> &'static str {
        "omdb"
    }
}
