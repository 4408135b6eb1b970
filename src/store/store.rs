use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};

use crate::config::StoreConfig;
use crate::document::{Document, Movie, MoviePatch, User, UserSummary};
use crate::provider::{MetadataProvider, ProviderError};
use crate::store::error::{Result, StoreError};
use crate::store::persistence::JsonFile;
use crate::types::identifiers::{MovieId, UserId, UserRef};

/// Users and their movie collections, backed by a single JSON file.
///
/// Reads copy out of the current document. Mutations are serialized:
/// each one is applied to a copy, the copy is persisted, and only then
/// does it replace the in-memory document. A failed save therefore
/// leaves memory matching the last durable state.
pub struct MovieStore<P> {
    file: JsonFile,
    provider: P,
    provider_timeout: Duration,
    document: RwLock<Document>,
    write_lock: Mutex<()>,
}

impl<P> MovieStore<P>
where
    P: MetadataProvider,
{
    /// Load the document at `config.data_path`.
    ///
    /// A missing file is created holding only the default user. A file
    /// that cannot be read, parsed or validated is an error.
    pub fn open(config: StoreConfig, provider: P) -> Result<Self> {
        let file = JsonFile::new(&config.data_path);
        let document = if file.exists() {
            file.load()?
        } else {
            let doc = Document::with_default_user();
            file.save(&doc)?;
            tracing::info!("Created storage file {}", file.path().display());
            doc
        };

        Ok(Self {
            file,
            provider,
            provider_timeout: config.provider_timeout,
            document: RwLock::new(document),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Deep copy of the current document.
    pub fn snapshot(&self) -> Document {
        self.document.read().clone()
    }

    /// All users, id and name only, in ascending id order.
    pub fn list_users(&self) -> Vec<UserSummary> {
        self.document
            .read()
            .users
            .values()
            .map(User::summary)
            .collect()
    }

    /// Resolve a user by id or by exact name.
    ///
    /// Names are not unique; a name lookup returns the matching user with
    /// the lowest id.
    pub fn get_user_info(&self, identifier: impl Into<UserRef>) -> Option<User> {
        let doc = self.document.read();
        match identifier.into() {
            UserRef::Id(id) => doc.user(id).cloned(),
            UserRef::Name(name) => doc.user_by_name(&name).cloned(),
        }
    }

    /// Copy of a user's collection.
    pub fn get_user_movies(&self, user_id: UserId) -> Result<BTreeMap<MovieId, Movie>> {
        let doc = self.document.read();
        doc.user(user_id)
            .map(|user| user.movies.clone())
            .ok_or(StoreError::UserNotFound(user_id))
    }

    pub fn get_movie(&self, user_id: UserId, movie_id: &MovieId) -> Result<Movie> {
        let doc = self.document.read();
        let user = doc.user(user_id).ok_or(StoreError::UserNotFound(user_id))?;
        user.movies
            .get(movie_id)
            .cloned()
            .ok_or_else(|| StoreError::movie_not_found(user_id, movie_id))
    }

    /// Every movie of every user, keyed by movie id.
    ///
    /// A movie held by several users appears once, as stored by the user
    /// with the highest id.
    pub fn list_movies(&self) -> BTreeMap<MovieId, Movie> {
        let doc = self.document.read();
        let mut all_movies = BTreeMap::new();
        for user in doc.users.values() {
            for (id, movie) in &user.movies {
                all_movies.insert(id.clone(), movie.clone());
            }
        }
        all_movies
    }

    /// Look `title` up with the metadata provider and add the result to
    /// the user's collection.
    ///
    /// No lock is held while the provider call is in flight; the lookup
    /// is bounded by the configured provider timeout. Must run inside a
    /// Tokio runtime.
    pub async fn add_movie(&self, user_id: UserId, title: &str) -> Result<Movie> {
        self.ensure_user(user_id)?;

        let lookup = tokio::time::timeout(
            self.provider_timeout,
            self.provider.fetch_movie_info(title),
        )
        .await;

        let metadata = match lookup {
            Ok(Ok(Some(metadata))) => metadata,
            Ok(Ok(None)) => return Err(StoreError::movie_not_found(user_id, title)),
            Ok(Err(e)) => {
                tracing::warn!("{} lookup for '{}' failed: {}", self.provider.name(), title, e);
                return Err(e.into());
            }
            Err(_) => {
                tracing::warn!(
                    "{} lookup for '{}' timed out after {:?}",
                    self.provider.name(),
                    title,
                    self.provider_timeout
                );
                return Err(ProviderError::Timeout(self.provider_timeout).into());
            }
        };

        let movie_id = Movie::id_from_metadata(&metadata)?;

        let added = self.commit(|doc| {
            let user = doc
                .user_mut(user_id)
                .ok_or(StoreError::UserNotFound(user_id))?;
            if user.movies.contains_key(&movie_id) {
                return Err(StoreError::MovieExists { user_id, movie_id });
            }
            let movie = Movie::from_metadata(metadata)?;
            user.movies.insert(movie.id.clone(), movie.clone());
            Ok(movie)
        })?;

        tracing::info!("Added movie {} ({}) for user {}", added.id, added.title, user_id);
        Ok(added)
    }

    /// Merge `patch` into an existing movie; fields absent from the patch
    /// keep their stored values.
    pub fn update_movie(
        &self,
        user_id: UserId,
        movie_id: &MovieId,
        patch: MoviePatch,
    ) -> Result<()> {
        patch.validate().map_err(StoreError::InvalidPatch)?;

        self.commit(|doc| {
            let user = doc
                .user_mut(user_id)
                .ok_or(StoreError::UserNotFound(user_id))?;
            let movie = user
                .movies
                .get_mut(movie_id)
                .ok_or_else(|| StoreError::movie_not_found(user_id, movie_id))?;
            patch.apply(movie);
            Ok(())
        })?;

        tracing::info!("Updated movie {} for user {}", movie_id, user_id);
        Ok(())
    }

    pub fn delete_movie(&self, user_id: UserId, movie_id: &MovieId) -> Result<()> {
        self.commit(|doc| {
            let user = doc
                .user_mut(user_id)
                .ok_or(StoreError::UserNotFound(user_id))?;
            user.movies
                .remove(movie_id)
                .map(|_| ())
                .ok_or_else(|| StoreError::movie_not_found(user_id, movie_id))
        })?;

        tracing::info!("Deleted movie {} for user {}", movie_id, user_id);
        Ok(())
    }

    /// Create a user with an empty collection and return its generated id.
    ///
    /// Name uniqueness is not checked here.
    pub fn add_user(&self, name: impl Into<String>) -> Result<UserId> {
        let name = name.into();
        let id = self.commit(|doc| {
            let id = doc.next_user_id().ok_or(StoreError::UserIdsExhausted)?;
            doc.users.insert(id, User::new(id, name));
            Ok(id)
        })?;

        tracing::info!("Added user {}", id);
        Ok(id)
    }

    pub fn update_user(&self, user_id: UserId, new_name: impl Into<String>) -> Result<()> {
        let new_name = new_name.into();
        self.commit(|doc| {
            let user = doc
                .user_mut(user_id)
                .ok_or(StoreError::UserNotFound(user_id))?;
            user.name = new_name;
            Ok(())
        })?;

        tracing::info!("Renamed user {}", user_id);
        Ok(())
    }

    /// Remove a user together with their whole collection.
    pub fn delete_user(&self, user_id: UserId) -> Result<()> {
        self.commit(|doc| {
            doc.users
                .remove(&user_id)
                .map(|_| ())
                .ok_or(StoreError::UserNotFound(user_id))
        })?;

        tracing::info!("Deleted user {}", user_id);
        Ok(())
    }

    fn ensure_user(&self, user_id: UserId) -> Result<()> {
        if self.document.read().user(user_id).is_some() {
            Ok(())
        } else {
            Err(StoreError::UserNotFound(user_id))
        }
    }

    // Mutate a copy, persist it, then swap it in.
    fn commit<T, F>(&self, mutate: F) -> Result<T>
    where
        F: FnOnce(&mut Document) -> Result<T>,
    {
        let _writer = self.write_lock.lock();
        let mut next = self.document.read().clone();
        let out = mutate(&mut next)?;
        self.file.save(&next)?;
        *self.document.write() = next;
        Ok(out)
    }
}
