use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::provider::MovieMetadata;
use crate::types::identifiers::MovieId;

#[derive(Debug, Error, PartialEq)]
pub enum MovieError {
    #[error("Metadata field `{0}` is missing")]
    MissingField(&'static str),
    #[error("Metadata field `{field}` is not a valid {expected}: {value:?}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// One entry of a user's collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub director: String,
    pub year: i32,
    pub rating: f64,
    pub poster_url: String,
}

impl Movie {
    /// Build a record from a provider lookup.
    ///
    /// Numeric fields arrive as strings and are coerced here; a missing
    /// poster becomes the empty string. Everything else is required.
    pub fn from_metadata(metadata: MovieMetadata) -> Result<Self, MovieError> {
        let id = Movie::id_from_metadata(&metadata)?;
        let title = metadata.title.ok_or(MovieError::MissingField("Title"))?;
        let director = metadata
            .director
            .ok_or(MovieError::MissingField("Director"))?;
        let year = metadata.year.ok_or(MovieError::MissingField("Year"))?;
        let rating = metadata
            .imdb_rating
            .ok_or(MovieError::MissingField("imdbRating"))?;

        Ok(Movie {
            id,
            title,
            director,
            year: parse_year(&year)?,
            rating: parse_rating(&rating)?,
            poster_url: metadata.poster.unwrap_or_default(),
        })
    }

    /// The provider identifier alone, without touching the other fields.
    pub fn id_from_metadata(metadata: &MovieMetadata) -> Result<MovieId, MovieError> {
        metadata
            .imdb_id
            .as_deref()
            .and_then(|id| MovieId::new(id).ok())
            .ok_or(MovieError::MissingField("imdbID"))
    }
}

fn parse_year(raw: &str) -> Result<i32, MovieError> {
    raw.trim().parse().map_err(|_| MovieError::InvalidField {
        field: "Year",
        expected: "integer",
        value: raw.to_string(),
    })
}

fn parse_rating(raw: &str) -> Result<f64, MovieError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite())
        .ok_or_else(|| MovieError::InvalidField {
            field: "imdbRating",
            expected: "number",
            value: raw.to_string(),
        })
}

// JSON has no encoding for NaN or the infinities
fn check_finite(field: &'static str, value: f64) -> Result<(), MovieError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(MovieError::InvalidField {
            field,
            expected: "finite number",
            value: value.to_string(),
        })
    }
}

/// Partial update for a [`Movie`]. Absent fields are left untouched.
///
/// The id is the storage key and cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MoviePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
}

impl MoviePatch {
    pub fn is_empty(&self) -> bool {
        self == &MoviePatch::default()
    }

    /// Reject values the document cannot store.
    pub fn validate(&self) -> Result<(), MovieError> {
        if let Some(rating) = self.rating {
            check_finite("rating", rating)?;
        }
        Ok(())
    }

    // Patch values override the stored ones
    pub fn apply(self, movie: &mut Movie) {
        if let Some(title) = self.title {
            movie.title = title;
        }
        if let Some(director) = self.director {
            movie.director = director;
        }
        if let Some(year) = self.year {
            movie.year = year;
        }
        if let Some(rating) = self.rating {
            movie.rating = rating;
        }
        if let Some(poster_url) = self.poster_url {
            movie.poster_url = poster_url;
        }
    }
}
