//! Key-value slot storage.
//!
//! The register keeps its whole resident list in one named slot, the same
//! way a browser page would use local storage. [`KeyValueStore`] is the
//! seam; [`SqliteStore`] is the durable implementation and [`MemoryStore`]
//! backs tests and dry runs.

pub mod migrations;
pub mod schema;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// A durable string-to-string map addressed by slot key.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Returns `true` if it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn remove(&mut self, key: &str) -> Result<bool>;

    /// When `key` was last written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn last_modified(&self, key: &str) -> Result<Option<DateTime<Utc>>>;

    /// Human-readable location of the backend, for diagnostics.
    fn location(&self) -> String;
}

/// `SQLite`-backed slot store.
#[derive(Debug)]
pub struct SqliteStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl SqliteStore {
    /// Open or create a slot database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening slot database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        info!("Slot database opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory slot database.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keys currently holding a value, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM slots ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r"
            INSERT INTO slots (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        debug!("Wrote {} bytes to slot {}", value.len(), key);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        let affected = self.conn.execute("DELETE FROM slots WHERE key = ?1", [key])?;
        Ok(affected > 0)
    }

    fn last_modified(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let stamp: Option<String> = self
            .conn
            .query_row(
                "SELECT updated_at FROM slots WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;

        Ok(stamp.and_then(|s| match DateTime::parse_from_rfc3339(&s) {
            Ok(dt) => Some(dt.with_timezone(&Utc)),
            Err(e) => {
                warn!("Ignoring unreadable timestamp {:?} on slot {}: {}", s, key, e);
                None
            }
        }))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Volatile slot store, optionally with a size quota.
///
/// A write that would push the total stored bytes over the quota fails,
/// the way browser storage rejects writes once full.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slots: HashMap<String, (String, DateTime<Utc>)>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    /// An empty store without a quota.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty store that rejects writes beyond `quota_bytes` in total.
    #[must_use]
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            slots: HashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    fn used_bytes_excluding(&self, key: &str) -> usize {
        self.slots
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, (v, _))| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).map(|(value, _)| value.clone()))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(quota) = self.quota_bytes {
            let needed = self.used_bytes_excluding(key) + key.len() + value.len();
            if needed > quota {
                return Err(Error::Io(std::io::Error::other(format!(
                    "storage quota exceeded ({needed} of {quota} bytes)"
                ))));
            }
        }
        self.slots
            .insert(key.to_string(), (value.to_string(), Utc::now()));
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        Ok(self.slots.remove(key).is_some())
    }

    fn last_modified(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        Ok(self.slots.get(key).map(|(_, at)| *at))
    }

    fn location(&self) -> String {
        ":memory:".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_storage() -> SqliteStore {
        SqliteStore::open_in_memory().expect("failed to create test storage")
    }

    #[test]
    fn test_open_in_memory() {
        let storage = SqliteStore::open_in_memory();
        assert!(storage.is_ok());
        assert_eq!(storage.unwrap().location(), ":memory:");
    }

    #[test]
    fn test_get_missing_slot() {
        let storage = create_test_storage();
        assert_eq!(storage.get("nothing").unwrap(), None);
        assert_eq!(storage.last_modified("nothing").unwrap(), None);
    }

    #[test]
    fn test_set_and_get() {
        let mut storage = create_test_storage();
        storage.set("buildingResidents", "[]").unwrap();
        assert_eq!(
            storage.get("buildingResidents").unwrap(),
            Some("[]".to_string())
        );
        assert!(storage.last_modified("buildingResidents").unwrap().is_some());
    }

    #[test]
    fn test_set_overwrites() {
        let mut storage = create_test_storage();
        storage.set("k", "one").unwrap();
        storage.set("k", "two").unwrap();
        assert_eq!(storage.get("k").unwrap(), Some("two".to_string()));
        assert_eq!(storage.keys().unwrap(), vec!["k".to_string()]);
    }

    #[test]
    fn test_remove() {
        let mut storage = create_test_storage();
        storage.set("k", "v").unwrap();
        assert!(storage.remove("k").unwrap());
        assert!(!storage.remove("k").unwrap());
        assert_eq!(storage.get("k").unwrap(), None);
    }

    #[test]
    fn test_unicode_value() {
        let mut storage = create_test_storage();
        let value = r#"[{"name":"محمد علي"}]"#;
        storage.set("k", value).unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some(value));
    }

    #[test]
    fn test_keys_sorted() {
        let mut storage = create_test_storage();
        storage.set("b", "2").unwrap();
        storage.set("a", "1").unwrap();
        assert_eq!(storage.keys().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_open_file_based_persists() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("residents.db");

        {
            let mut storage = SqliteStore::open(&db_path).unwrap();
            storage.set("k", "persisted").unwrap();
            assert_eq!(storage.path(), db_path);
        }

        let storage = SqliteStore::open(&db_path).unwrap();
        assert_eq!(storage.get("k").unwrap(), Some("persisted".to_string()));
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested_path = dir.path().join("nested/deeper/residents.db");

        let storage = SqliteStore::open(&nested_path).unwrap();
        assert!(nested_path.exists());
        assert_eq!(storage.location(), nested_path.display().to_string());
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
        assert!(store.last_modified("k").unwrap().is_some());
        assert!(store.remove("k").unwrap());
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_memory_store_quota() {
        let mut store = MemoryStore::with_quota(10);
        store.set("k", "12345").unwrap();

        let err = store.set("k", "0123456789").unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
        assert_eq!(store.get("k").unwrap(), Some("12345".to_string()));

        // Replacing a value only counts the new size.
        store.set("k", "abcdefg").unwrap();
    }
}
