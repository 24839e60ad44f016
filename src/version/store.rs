//! Key-value persistence for engine state

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

#[cfg(test)]
use mockall::automock;

use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use crate::version::error::StoreError;

/// Read/write surface the engine persists its state through
#[cfg_attr(test, automock)]
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// SQLite-backed store, one row per key
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new(db_path: &Path) -> Result<Self, StoreError> {
        info!("Opening state database at {:?}", db_path);

        let conn = Connection::open(db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.create_schema()?;

        Ok(store)
    }

    /// In-memory database, mostly useful for tests
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let store = Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        };
        store.create_schema()?;
        Ok(store)
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    fn current_timestamp_ms() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn create_schema(&self) -> Result<(), StoreError> {
        debug!("Creating state schema");

        let conn = self.lock_conn()?;
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )
            "#,
            [],
        )?;

        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.lock_conn()?;
        let value = conn
            .query_row("SELECT value FROM state WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let conn = self.lock_conn()?;
        conn.execute(
            r#"
            INSERT INTO state (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            (key, value, Self::current_timestamp_ms()),
        )?;
        debug!("Stored {} = {}", key, value);
        Ok(())
    }
}

/// Non-persistent store for hosts that keep state elsewhere
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_values(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.values.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock_values()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.lock_values()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn sqlite_get_returns_none_for_missing_key() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get("skipped_version").unwrap(), None);
    }

    #[test]
    fn sqlite_set_overwrites_existing_value() {
        let store = SqliteStore::open_in_memory().unwrap();

        store.set("skipped_version", "1.0.0").unwrap();
        store.set("skipped_version", "2.0.0").unwrap();

        assert_eq!(
            store.get("skipped_version").unwrap(),
            Some("2.0.0".to_string())
        );
    }

    #[test]
    fn sqlite_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("state.db");

        SqliteStore::new(&db_path)
            .unwrap()
            .set("last_check_at", "2024-03-01T12:00:00Z")
            .unwrap();

        let reopened = SqliteStore::new(&db_path).unwrap();
        assert_eq!(
            reopened.get("last_check_at").unwrap(),
            Some("2024-03-01T12:00:00Z".to_string())
        );
    }

    #[test]
    fn memory_store_round_trips_values() {
        let store = MemoryStore::new();
        store.set("last_prompt_at", "x").unwrap();
        assert_eq!(store.get("last_prompt_at").unwrap(), Some("x".to_string()));
        assert_eq!(store.get("other").unwrap(), None);
    }
}
