//! State store implementations

pub mod sqlite;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::application::errors::StorageError;
use crate::domain::traits::StateStore;

pub use sqlite::SqliteStateStore;

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// In-process store for development and tests. Contents are lost on restart.
#[derive(Clone, Default)]
pub struct MemoryStateStore {
    kv: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.kv.read().await.values().filter(|e| e.is_live(now)).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let kv = self.kv.read().await;
        let now = Instant::now();
        Ok(kv.get(key).filter(|e| e.is_live(now)).map(|e| e.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StorageError> {
        let now = Instant::now();
        let mut kv = self.kv.write().await;
        kv.retain(|_, e| e.is_live(now));
        kv.insert(key.to_string(), Entry {
            value: value.to_string(),
            expires_at: ttl.and_then(|ttl| now.checked_add(ttl)),
        });
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut kv = self.kv.write().await;
        kv.remove(key);
        Ok(())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
