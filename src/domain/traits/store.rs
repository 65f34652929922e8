use std::time::Duration;

use async_trait::async_trait;
use crate::application::errors::StorageError;

/// Store trait - key/value persistence for per-user conversation state
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value. With a ttl the key reads as absent once it elapses.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StorageError>;

    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Check the backing store is reachable
    async fn ping(&self) -> Result<(), StorageError>;

    async fn get_int(&self, key: &str) -> Result<Option<i64>, StorageError> {
        match self.get(key).await? {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|e| StorageError::Serialization(format!("{}: {}", key, e))),
            None => Ok(None),
        }
    }

    async fn set_int(&self, key: &str, value: i64, ttl: Option<Duration>) -> Result<(), StorageError> {
        self.set(key, &value.to_string(), ttl).await
    }

    async fn get_string(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.get(key).await
    }

    async fn set_string(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StorageError> {
        self.set(key, value, ttl).await
    }
}
