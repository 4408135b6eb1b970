#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use movie_store::provider::{MetadataProvider, MovieMetadata, ProviderError};
use movie_store::{MovieStore, StoreConfig};
use parking_lot::Mutex;

#[derive(Debug, Clone)]
pub enum Reply {
    Found(MovieMetadata),
    Fail(String),
    Slow(Duration, MovieMetadata),
}

/// Answers from a fixed title -> reply table; unknown titles are not found.
#[derive(Default)]
pub struct ScriptedProvider {
    replies: Mutex<HashMap<String, Reply>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, title: &str, reply: Reply) -> Self {
        self.replies.lock().insert(title.to_string(), reply);
        self
    }

    pub fn found(self, title: &str, metadata: MovieMetadata) -> Self {
        self.reply(title, Reply::Found(metadata))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataProvider for ScriptedProvider {
    async fn fetch_movie_info(&self, title: &str) -> Result<Option<MovieMetadata>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.replies.lock().get(title).cloned();
        match reply {
            None => Ok(None),
            Some(Reply::Found(metadata)) => Ok(Some(metadata)),
            Some(Reply::Fail(message)) => Err(ProviderError::Other(message)),
            Some(Reply::Slow(delay, metadata)) => {
                tokio::time::sleep(delay).await;
                Ok(Some(metadata))
            }
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

pub fn metadata(
    imdb_id: &str,
    title: &str,
    director: &str,
    year: &str,
    rating: &str,
) -> MovieMetadata {
    MovieMetadata {
        imdb_id: Some(imdb_id.to_string()),
        title: Some(title.to_string()),
        director: Some(director.to_string()),
        year: Some(year.to_string()),
        imdb_rating: Some(rating.to_string()),
        poster: Some(format!("https://posters.example/{imdb_id}.jpg")),
    }
}

pub fn inception() -> MovieMetadata {
    metadata("tt1375666", "Inception", "Christopher Nolan", "2010", "8.8")
}

pub fn heat() -> MovieMetadata {
    metadata("tt0113277", "Heat", "Michael Mann", "1995", "8.3")
}

pub fn open_store(path: &Path, provider: ScriptedProvider) -> MovieStore<Arc<ScriptedProvider>> {
    MovieStore::open(StoreConfig::new(path), Arc::new(provider)).expect("open store")
}
