//! SQLite-backed state store

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::application::errors::StorageError;
use crate::domain::traits::StateStore;

/// Durable key/value store. Expired rows read as absent and are purged on open and on every write.
#[derive(Clone)]
pub struct SqliteStateStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStateStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS conversation_state (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                expires_at INTEGER,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_conversation_state_expires ON conversation_state(expires_at)",
            [],
        )?;

        let store = Self { conn: Arc::new(Mutex::new(conn)) };
        let purged = store.with_conn(|conn| purge_expired(conn, now_millis()))?;
        if purged > 0 {
            tracing::info!("Purged {} expired conversation state entries", purged);
        }
        Ok(store)
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T, StorageError>) -> Result<T, StorageError> {
        let conn = self.conn.lock()
            .map_err(|_| StorageError::Database("Lock poisoned".to_string()))?;
        f(&conn)
    }

    /// Run a blocking statement off the async runtime
    async fn run<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StorageError> + Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.with_conn(f))
            .await
            .map_err(|e| StorageError::Database(format!("Store task failed: {}", e)))?
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Absolute expiry for a ttl, rejecting values past the `i64` millisecond range
fn expiry_millis(now: i64, ttl: Duration) -> Result<i64, StorageError> {
    i64::try_from(ttl.as_millis())
        .ok()
        .and_then(|ttl| now.checked_add(ttl))
        .ok_or_else(|| StorageError::Serialization(format!("ttl {:?} is out of range", ttl)))
}

fn purge_expired(conn: &Connection, now: i64) -> Result<usize, StorageError> {
    let rows = conn.execute(
        "DELETE FROM conversation_state WHERE expires_at IS NOT NULL AND expires_at <= ?1",
        params![now],
    )?;
    Ok(rows)
}

#[async_trait]
impl StateStore for SqliteStateStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let key = key.to_string();
        self.run(move |conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM conversation_state
                     WHERE key = ?1 AND (expires_at IS NULL OR expires_at > ?2)",
                    params![key, now_millis()],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(value)
        })
        .await
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StorageError> {
        let key = key.to_string();
        let value = value.to_string();
        let now = now_millis();
        let expires_at = ttl.map(|ttl| expiry_millis(now, ttl)).transpose()?;
        self.run(move |conn| {
            purge_expired(conn, now)?;
            conn.execute(
                "INSERT INTO conversation_state (key, value, expires_at, updated_at)
                 VALUES (?1, ?2, ?3, datetime('now'))
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    expires_at = excluded.expires_at,
                    updated_at = excluded.updated_at",
                params![key, value, expires_at],
            )?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let key = key.to_string();
        self.run(move |conn| {
            conn.execute("DELETE FROM conversation_state WHERE key = ?1", params![key])?;
            Ok(())
        })
        .await
    }

    async fn ping(&self) -> Result<(), StorageError> {
        self.run(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
        .await
    }
}
