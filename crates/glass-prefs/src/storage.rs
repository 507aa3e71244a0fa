//! Local key-value persistence primitive.
//!
//! Values are JSON documents keyed by a stable string. A write always
//! replaces the whole document for its key.

use std::collections::HashMap;
use std::path::Path;

use glass_core::{PersistenceError, RusqliteErrorExt};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const USER_PREFERENCES_KEY: &str = "weather-glass-user-preferences";
pub const ENHANCED_THEME_KEY: &str = "weather-glass-enhanced-theme";
pub const FAVORITE_CITIES_KEY: &str = "weather-glass-favorite-cities";
pub const WIDGET_LAYOUT_KEY: &str = "weather-glass-widget-layout";
pub const RAIN_DEMO_MODE_KEY: &str = "weather-glass-rain-demo-mode";

/// Synchronous get/set over string values.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
    fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}

/// Read and decode the JSON document stored under `key`.
pub fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, PersistenceError> {
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encode `value` and replace the document stored under `key`.
pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), PersistenceError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

/// Write `value`, logging instead of propagating failures.
///
/// The in-memory record stays authoritative when the write is lost.
pub(crate) fn persist<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) {
    if let Err(e) = write_json(store, key, value) {
        tracing::error!("Error saving {} to storage: {}", key, e);
    }
}

/// SQLite-backed store, one row per key.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create the database
    pub fn open(path: &Path) -> Result<Self, PersistenceError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| PersistenceError::Unavailable(e.to_string()))?;
        }
        let conn = Connection::open(path).map_err(RusqliteErrorExt::into_persistence_error)?;
        Self::with_connection(conn)
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> Result<Self, PersistenceError> {
        let conn = Connection::open_in_memory().map_err(RusqliteErrorExt::into_persistence_error)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, PersistenceError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );",
        )
        .map_err(RusqliteErrorExt::into_persistence_error)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.conn
            .lock()
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(RusqliteErrorExt::into_persistence_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let now = chrono::Utc::now().timestamp_millis();
        self.conn
            .lock()
            .execute(
                "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
                params![key, value, now],
            )
            .map_err(RusqliteErrorExt::into_persistence_error)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        self.conn
            .lock()
            .execute("DELETE FROM kv WHERE key = ?1", params![key])
            .map_err(RusqliteErrorExt::into_persistence_error)?;
        Ok(())
    }
}

/// Process-local store; nothing survives the process.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_roundtrip_and_replace() {
        let store = SqliteStore::in_memory().unwrap();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "1").unwrap();
        store.set("k", "2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("2"));

        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_sqlite_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("storage.db");
        {
            let store = SqliteStore::open(&path).unwrap();
            write_json(&store, RAIN_DEMO_MODE_KEY, &true).unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        let value: Option<bool> = read_json(&store, RAIN_DEMO_MODE_KEY).unwrap();
        assert_eq!(value, Some(true));
    }

    #[test]
    fn test_read_json_reports_corrupt_document() {
        let store = MemoryStore::new();
        store.set("bad", "{oops").unwrap();
        let result: Result<Option<serde_json::Value>, _> = read_json(&store, "bad");
        assert!(matches!(result, Err(PersistenceError::Serialization(_))));
    }
}
