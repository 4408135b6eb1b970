mod common;

use std::fs;

use common::{inception, open_store, ScriptedProvider};
use movie_store::document::{Document, DocumentError, UserSummary, DEFAULT_USER_NAME};
use movie_store::types::{MovieId, UserId};
use movie_store::StoreError;
use serde_json::{json, Value};
use tempfile::tempdir;

#[test]
fn missing_file_starts_with_default_user() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");

    let store = open_store(&path, ScriptedProvider::new());

    assert_eq!(
        store.list_users(),
        vec![UserSummary {
            id: UserId::new(0),
            name: DEFAULT_USER_NAME.to_string(),
        }]
    );
    assert!(path.exists(), "default document should be written on open");
}

#[test]
fn default_document_layout_on_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("data.json");

    let _store = open_store(&path, ScriptedProvider::new());

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains('\n'), "document should be pretty-printed");

    let on_disk: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        on_disk,
        json!({
            "users": {
                "0": { "id": 0, "name": "Default User", "movies": {} }
            }
        })
    );
}

#[tokio::test]
async fn reload_yields_equal_document() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");

    let before = {
        let store = open_store(&path, ScriptedProvider::new().found("Inception", inception()));
        let alice = store.add_user("Alice").unwrap();
        store.add_user("Bob").unwrap();
        store.add_movie(alice, "Inception").await.unwrap();
        store.snapshot()
    };

    let reopened = open_store(&path, ScriptedProvider::new());
    assert_eq!(reopened.snapshot(), before);
    assert_eq!(reopened.list_users().len(), 3);
}

#[test]
fn movie_layout_on_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    fs::write(
        &path,
        r#"{
  "users": {
    "2": {
      "id": 2,
      "name": "Carol",
      "movies": {
        "tt0113277": {
          "id": "tt0113277", "title": "Heat", "director": "Michael Mann",
          "year": 1995, "rating": 8.3, "poster_url": ""
        }
      }
    }
  }
}"#,
    )
    .unwrap();

    let store = open_store(&path, ScriptedProvider::new());
    let movie = store
        .get_movie(UserId::new(2), &MovieId::new("tt0113277").unwrap())
        .unwrap();
    assert_eq!(movie.year, 1995);
    assert_eq!(movie.rating, 8.3);
    assert_eq!(movie.poster_url, "");
}

#[test]
fn unreadable_content_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    fs::write(&path, "{ not json").unwrap();

    let result = movie_store::MovieStore::open(
        movie_store::StoreConfig::new(&path),
        ScriptedProvider::new(),
    );
    assert!(matches!(result, Err(StoreError::CorruptDocument { .. })));

    // The broken file is left for the operator to inspect.
    assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
}

#[test]
fn non_numeric_user_key_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    fs::write(
        &path,
        r#"{"users": {"alice": {"id": 1, "name": "Alice", "movies": {}}}}"#,
    )
    .unwrap();

    let result = movie_store::MovieStore::open(
        movie_store::StoreConfig::new(&path),
        ScriptedProvider::new(),
    );
    assert!(matches!(result, Err(StoreError::CorruptDocument { .. })));
}

#[test]
fn key_and_id_must_agree() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    fs::write(
        &path,
        r#"{"users": {"1": {"id": 7, "name": "Alice", "movies": {}}}}"#,
    )
    .unwrap();

    let result = movie_store::MovieStore::open(
        movie_store::StoreConfig::new(&path),
        ScriptedProvider::new(),
    );
    match result {
        Err(StoreError::InvalidDocument { source, .. }) => assert_eq!(
            source,
            DocumentError::UserKeyMismatch {
                key: UserId::new(1),
                id: UserId::new(7),
            }
        ),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("mismatched document should not load"),
    }
}

#[test]
fn leading_zero_user_key_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    fs::write(
        &path,
        r#"{"users": {"01": {"id": 1, "name": "Alice", "movies": {}}}}"#,
    )
    .unwrap();

    let result = movie_store::MovieStore::open(
        movie_store::StoreConfig::new(&path),
        ScriptedProvider::new(),
    );
    assert!(matches!(result, Err(StoreError::CorruptDocument { .. })));
}

#[test]
fn movie_key_and_id_must_agree() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    fs::write(
        &path,
        r#"{"users": {"1": {"id": 1, "name": "Alice", "movies": {
            "tt0000001": {
                "id": "tt0000002", "title": "Heat", "director": "Michael Mann",
                "year": 1995, "rating": 8.3, "poster_url": ""
            }
        }}}}"#,
    )
    .unwrap();

    let result = movie_store::MovieStore::open(
        movie_store::StoreConfig::new(&path),
        ScriptedProvider::new(),
    );
    match result {
        Err(StoreError::InvalidDocument { source, .. }) => assert_eq!(
            source,
            DocumentError::MovieKeyMismatch {
                user: UserId::new(1),
                key: MovieId::new("tt0000001").unwrap(),
                id: MovieId::new("tt0000002").unwrap(),
            }
        ),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("mismatched movie key should not load"),
    }
}

#[test]
fn empty_movie_key_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    fs::write(
        &path,
        r#"{"users": {"3": {"id": 3, "name": "Carol", "movies": {
            "": {
                "id": "", "title": "?", "director": "?",
                "year": 2000, "rating": 1.0, "poster_url": ""
            }
        }}}}"#,
    )
    .unwrap();

    let result = movie_store::MovieStore::open(
        movie_store::StoreConfig::new(&path),
        ScriptedProvider::new(),
    );
    match result {
        Err(StoreError::InvalidDocument { source, .. }) => {
            assert_eq!(source, DocumentError::EmptyMovieId(UserId::new(3)))
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("empty movie key should not load"),
    }
}

#[test]
fn failed_save_leaves_memory_at_last_durable_state() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    let store = open_store(&path, ScriptedProvider::new());
    let alice = store.add_user("Alice").unwrap();
    let durable = store.snapshot();

    // A directory in place of the file makes the final rename fail.
    fs::remove_file(&path).unwrap();
    fs::create_dir(&path).unwrap();
    fs::write(path.join("occupied"), b"x").unwrap();

    let result = store.update_user(alice, "Alicia");
    assert!(matches!(result, Err(StoreError::Storage { .. })));
    assert_eq!(store.snapshot(), durable);
    assert_eq!(store.get_user_info(alice).unwrap().name, "Alice");

    let result = store.add_user("Bob");
    assert!(matches!(result, Err(StoreError::Storage { .. })));
    assert_eq!(store.list_users().len(), 2);

    assert!(
        !dir.path().join("data.json.tmp").exists(),
        "temporary file should be cleaned up"
    );
}

#[test]
fn saved_file_tracks_every_mutation() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    let store = open_store(&path, ScriptedProvider::new());

    let id = store.add_user("Alice").unwrap();
    store.update_user(id, "Alicia").unwrap();

    let on_disk: Document = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk, store.snapshot());
    assert_eq!(on_disk.users[&id].name, "Alicia");
}
