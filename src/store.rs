use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::{Note, Task, User};

/// Namespace prefix for every key this app writes
const KEY_PREFIX: &str = "daytoday";

/// Reserved key for the session identity mirror; not scoped by uid because
/// exactly one session operates per store.
const SESSION_USER_KEY: &str = "daytoday:session:user";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to create store directory: {0}")]
    Directory(String),
}

/// The two durable collections, each stored as one JSON value per user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Tasks,
    Notes,
}

impl CollectionKind {
    fn key_part(self) -> &'static str {
        match self {
            CollectionKind::Tasks => "tasks",
            CollectionKind::Notes => "notes",
        }
    }
}

/// Storage key for a collection: stable and collision-free across users
fn collection_key(kind: CollectionKind, uid: &str) -> String {
    format!("{}:{}:{}", KEY_PREFIX, kind.key_part(), uid)
}

/// Key-value persistence over an embedded SQLite file. Collections are
/// written as whole JSON documents: one full overwrite per write, never
/// incremental.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the store file and initialize the schema
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let db_path = PathBuf::from(path);

        if let Some(parent) = db_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::Directory(e.to_string()))?;
            }
        }

        let conn = Connection::open(&db_path)?;
        let store = Store { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// In-memory store, used by tests
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Store { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key     TEXT PRIMARY KEY,
                value   TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                rusqlite::params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", rusqlite::params![key])?;
        Ok(())
    }

    fn read_collection<T: DeserializeOwned>(
        &self,
        kind: CollectionKind,
        uid: &str,
    ) -> Result<Vec<T>, StoreError> {
        match self.get(&collection_key(kind, uid))? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn write_collection<T: Serialize>(
        &self,
        kind: CollectionKind,
        uid: &str,
        items: &[T],
    ) -> Result<(), StoreError> {
        let json = serde_json::to_string(items)?;
        self.put(&collection_key(kind, uid), &json)
    }

    pub fn read_tasks(&self, uid: &str) -> Result<Vec<Task>, StoreError> {
        self.read_collection(CollectionKind::Tasks, uid)
    }

    pub fn write_tasks(&self, uid: &str, tasks: &[Task]) -> Result<(), StoreError> {
        self.write_collection(CollectionKind::Tasks, uid, tasks)
    }

    pub fn read_notes(&self, uid: &str) -> Result<Vec<Note>, StoreError> {
        self.read_collection(CollectionKind::Notes, uid)
    }

    pub fn write_notes(&self, uid: &str, notes: &[Note]) -> Result<(), StoreError> {
        self.write_collection(CollectionKind::Notes, uid, notes)
    }

    /// Identity mirrored from the last login, if any
    pub fn session_user(&self) -> Result<Option<User>, StoreError> {
        match self.get(SESSION_USER_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn set_session_user(&self, user: &User) -> Result<(), StoreError> {
        let json = serde_json::to_string(user)?;
        self.put(SESSION_USER_KEY, &json)
    }

    pub fn clear_session_user(&self) -> Result<(), StoreError> {
        self.remove(SESSION_USER_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use pretty_assertions::assert_eq;

    fn sample_tasks(uid: &str) -> Vec<Task> {
        vec![
            Task::new(uid.into(), "Buy milk".into(), Priority::Low, "2024-05-01".into()),
            Task::new(uid.into(), "Stretch".into(), Priority::Medium, "2024-05-02".into()),
        ]
    }

    #[test]
    fn read_missing_collection_returns_empty() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.read_tasks("user-nobody").unwrap().is_empty());
        assert!(store.read_notes("user-nobody").unwrap().is_empty());
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let store = Store::open_in_memory().unwrap();
        let tasks = sample_tasks("user-a");
        store.write_tasks("user-a", &tasks).unwrap();
        assert_eq!(store.read_tasks("user-a").unwrap(), tasks);

        let notes = vec![Note::new("user-a".into(), "Ideas".into(), "lots".into())];
        store.write_notes("user-a", &notes).unwrap();
        assert_eq!(store.read_notes("user-a").unwrap(), notes);
    }

    #[test]
    fn round_trip_empty_collection() {
        let store = Store::open_in_memory().unwrap();
        store.write_tasks("user-a", &[]).unwrap();
        assert!(store.read_tasks("user-a").unwrap().is_empty());
    }

    #[test]
    fn collections_are_scoped_per_user() {
        let store = Store::open_in_memory().unwrap();
        store.write_tasks("user-a", &sample_tasks("user-a")).unwrap();
        store.write_tasks("user-b", &sample_tasks("user-b")[..1]).unwrap();

        assert_eq!(store.read_tasks("user-a").unwrap().len(), 2);
        assert_eq!(store.read_tasks("user-b").unwrap().len(), 1);
        assert!(store.read_tasks("user-c").unwrap().is_empty());
    }

    #[test]
    fn write_is_a_full_overwrite() {
        let store = Store::open_in_memory().unwrap();
        store.write_tasks("user-a", &sample_tasks("user-a")).unwrap();
        store.write_tasks("user-a", &[]).unwrap();
        assert!(store.read_tasks("user-a").unwrap().is_empty());
    }

    #[test]
    fn session_mirror_set_and_clear() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.session_user().unwrap().is_none());

        let user = User {
            uid: "user-demo".into(),
            email: Some("demo@example.com".into()),
            display_name: Some("demo".into()),
            photo_url: None,
        };
        store.set_session_user(&user).unwrap();
        assert_eq!(store.session_user().unwrap(), Some(user));

        store.clear_session_user().unwrap();
        assert!(store.session_user().unwrap().is_none());
    }

    #[test]
    fn store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");
        let path_str = path.to_str().unwrap();

        let tasks = sample_tasks("user-a");
        {
            let store = Store::open(path_str).unwrap();
            store.write_tasks("user-a", &tasks).unwrap();
        }
        let store = Store::open(path_str).unwrap();
        assert_eq!(store.read_tasks("user-a").unwrap(), tasks);
    }
}
