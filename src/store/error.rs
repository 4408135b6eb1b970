use std::path::PathBuf;

use thiserror::Error;

use crate::document::{DocumentError, MovieError};
use crate::provider::ProviderError;
use crate::types::identifiers::{IdentifierError, MovieId, UserId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("User with ID {0} not found")]
    UserNotFound(UserId),

    /// `movie` is the movie id, or the looked-up title when the provider
    /// knows no such movie.
    #[error("Movie {movie:?} not found for user {user_id}")]
    MovieNotFound { user_id: UserId, movie: String },

    #[error("Movie {movie_id} already exists in the collection of user {user_id}")]
    MovieExists { user_id: UserId, movie_id: MovieId },

    #[error("Malformed movie metadata: {0}")]
    MetadataFormat(#[from] MovieError),

    #[error("Invalid movie update: {0}")]
    InvalidPatch(#[source] MovieError),

    #[error("No user id left: the highest id is already {}", u64::MAX)]
    UserIdsExhausted,

    #[error("Metadata provider unavailable: {0}")]
    ProviderUnavailable(#[from] ProviderError),

    #[error("Storage error on {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unreadable document {path}: {source}")]
    CorruptDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid document {path}: {source}")]
    InvalidDocument {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },

    #[error(transparent)]
    Identifier(#[from] IdentifierError),
}

impl StoreError {
    pub(crate) fn movie_not_found(user_id: UserId, movie: impl ToString) -> Self {
        StoreError::MovieNotFound {
            user_id,
            movie: movie.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
