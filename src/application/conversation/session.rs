//! Per-user conversation state persisted in a [`StateStore`]

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::application::errors::StorageError;
use crate::domain::entities::ConversationState;
use crate::domain::traits::StateStore;

/// What was stored for a user when a message arrived
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub state: ConversationState,
    pub draft_name: Option<String>,
}

/// Reads and writes the state code and draft name for each user.
///
/// Every store call is bounded by `timeout`; every write expires after `ttl`.
#[derive(Clone)]
pub struct UserSessions {
    store: Arc<dyn StateStore>,
    timeout: Duration,
    ttl: Option<Duration>,
}

impl UserSessions {
    pub fn new(store: Arc<dyn StateStore>, timeout: Duration, ttl: Option<Duration>) -> Self {
        Self { store, timeout, ttl }
    }

    pub fn state_key(user_id: i64) -> String {
        format!("user:{}.state", user_id)
    }

    pub fn draft_key(user_id: i64) -> String {
        format!("user:{}.state.name", user_id)
    }

    async fn bounded<T, F>(&self, op: F) -> Result<T, StorageError>
    where
        F: Future<Output = Result<T, StorageError>>,
    {
        match tokio::time::timeout(self.timeout, op).await {
            Ok(result) => result,
            Err(_) => Err(StorageError::Timeout(self.timeout)),
        }
    }

    /// Load state and draft. A user with nothing stored is in `Default`.
    pub async fn load(&self, user_id: i64) -> Result<Session, StorageError> {
        let code = self
            .bounded(self.store.get_int(&Self::state_key(user_id)))
            .await?;
        let draft_name = self
            .bounded(self.store.get_string(&Self::draft_key(user_id)))
            .await?;

        let state = match code {
            None => ConversationState::Default,
            Some(code) => ConversationState::from_code(code).unwrap_or_else(|| {
                tracing::warn!("Unknown state code {} for user {}, treating as default", code, user_id);
                ConversationState::Default
            }),
        };

        Ok(Session { state, draft_name })
    }

    pub async fn save_state(&self, user_id: i64, state: ConversationState) -> Result<(), StorageError> {
        self.bounded(self.store.set_int(&Self::state_key(user_id), state.code(), self.ttl))
            .await
    }

    pub async fn save_draft(&self, user_id: i64, name: &str) -> Result<(), StorageError> {
        self.bounded(self.store.set_string(&Self::draft_key(user_id), name, self.ttl))
            .await
    }

    pub async fn clear_draft(&self, user_id: i64) -> Result<(), StorageError> {
        self.bounded(self.store.delete(&Self::draft_key(user_id))).await
    }
}
