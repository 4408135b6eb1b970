//! Movie metadata sources.
//!
//! The store only depends on [`MetadataProvider`]; [`OmdbClient`] is the
//! production implementation backed by the OMDb HTTP API.

mod omdb;
mod provider;

pub use omdb::{OmdbClient, OmdbResponse};
pub use provider::{MetadataProvider, MovieMetadata, ProviderError};
