use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Integer user identifier.
///
/// Serialized as a plain integer inside records and as its decimal string
/// when used as a map key, which is the canonical storage key form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("User id must be a non-negative decimal integer: {0:?}")]
    InvalidUserId(String),
    #[error("Movie id must not be empty")]
    EmptyMovieId,
}

impl UserId {
    pub const fn new(id: u64) -> Self {
        UserId(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// The id following this one, or `None` past `u64::MAX`.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(UserId)
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        UserId(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse the canonical key form: ASCII digits only, no sign, no leading zeros.
impl FromStr for UserId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let canonical = !s.is_empty()
            && s.bytes().all(|b| b.is_ascii_digit())
            && (s.len() == 1 || !s.starts_with('0'));
        if !canonical {
            return Err(IdentifierError::InvalidUserId(s.to_string()));
        }
        s.parse::<u64>()
            .map(UserId)
            .map_err(|_| IdentifierError::InvalidUserId(s.to_string()))
    }
}

/// Provider-issued movie identifier (e.g. an IMDb id such as `tt1375666`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(String);

impl MovieId {
    pub fn new(id: impl Into<String>) -> Result<Self, IdentifierError> {
        let id = id.into();
        if id.is_empty() {
            return Err(IdentifierError::EmptyMovieId);
        }
        Ok(MovieId(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MovieId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MovieId::new(s)
    }
}

/// How a caller names a user: by exact id or by exact name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRef {
    Id(UserId),
    Name(String),
}

impl From<UserId> for UserRef {
    fn from(id: UserId) -> Self {
        UserRef::Id(id)
    }
}

impl From<u64> for UserRef {
    fn from(id: u64) -> Self {
        UserRef::Id(UserId(id))
    }
}

impl From<&str> for UserRef {
    fn from(name: &str) -> Self {
        UserRef::Name(name.to_string())
    }
}

impl From<String> for UserRef {
    fn from(name: String) -> Self {
        UserRef::Name(name)
    }
}
