//! Data layer for a personal movie list.
//!
//! `movie-store` keeps users and their favorite movies in a single
//! pretty-printed JSON document. Movies are added by title and enriched
//! through a [`provider::MetadataProvider`] (OMDb in production). Every
//! mutation rewrites the whole document atomically before it becomes
//! visible to readers.

pub mod config;
pub mod document;
pub mod provider;
pub mod store;
pub mod types;

pub use config::{OmdbConfig, StoreConfig};
pub use store::{MovieStore, StoreError};
