use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::user::User;
use crate::types::identifiers::{MovieId, UserId};

pub const DEFAULT_USER_NAME: &str = "Default User";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("User stored under key {key} has id {id}")]
    UserKeyMismatch { key: UserId, id: UserId },
    #[error("Movie stored under key {key:?} of user {user} has id {id:?}")]
    MovieKeyMismatch {
        user: UserId,
        key: MovieId,
        id: MovieId,
    },
    #[error("User {0} holds a movie with an empty id")]
    EmptyMovieId(UserId),
}

/// The whole persisted state: every user and their collections.
///
/// Users are keyed by id and iterate in ascending id order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub users: BTreeMap<UserId, User>,
}

impl Document {
    pub fn empty() -> Self {
        Self {
            users: BTreeMap::new(),
        }
    }

    /// The document a fresh storage location starts with.
    pub fn with_default_user() -> Self {
        let mut doc = Self::empty();
        let id = UserId::new(0);
        doc.users.insert(id, User::new(id, DEFAULT_USER_NAME));
        doc
    }

    /// Check that every map key agrees with the record stored under it.
    pub fn validate(&self) -> Result<(), DocumentError> {
        for (key, user) in &self.users {
            if *key != user.id {
                return Err(DocumentError::UserKeyMismatch {
                    key: *key,
                    id: user.id,
                });
            }
            for (movie_key, movie) in &user.movies {
                if movie_key.as_str().is_empty() {
                    return Err(DocumentError::EmptyMovieId(user.id));
                }
                if *movie_key != movie.id {
                    return Err(DocumentError::MovieKeyMismatch {
                        user: user.id,
                        key: movie_key.clone(),
                        id: movie.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// `max(existing ids) + 1`, or `1` when there are no users at all.
    ///
    /// `None` once the highest id is `u64::MAX`.
    pub fn next_user_id(&self) -> Option<UserId> {
        match self.users.keys().next_back() {
            Some(highest) => highest.next(),
            None => Some(UserId::new(1)),
        }
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn user_mut(&mut self, id: UserId) -> Option<&mut User> {
        self.users.get_mut(&id)
    }

    /// First user with exactly this name, in ascending id order.
    pub fn user_by_name(&self, name: &str) -> Option<&User> {
        self.users.values().find(|user| user.name == name)
    }
}
