use async_trait::async_trait;
use crate::application::errors::BotError;

/// Bot trait - abstraction for messaging platform adapters
///
/// Shared between the update loop and the event relay, so implementations
/// must tolerate concurrent callers.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Send a plain text message to a chat
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), BotError>;
}

/// Identity of the bot account, as reported by the platform
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
    pub username: String,
}
