//! Event relay - delivers due-reminder events as chat messages

use std::sync::Arc;

use crate::application::errors::{BotError, EventError};
use crate::application::replies;
use crate::domain::entities::Reminder;
use crate::domain::traits::{Bot, EventSource};

pub struct EventRelay<S: EventSource> {
    source: S,
    bot: Arc<dyn Bot>,
}

impl<S: EventSource> EventRelay<S> {
    pub fn new(source: S, bot: Arc<dyn Bot>) -> Self {
        Self { source, bot }
    }

    /// Relay events until the source fails or closes.
    ///
    /// Never returns `Ok`: an exhausted source is an error the caller must
    /// treat as fatal.
    pub async fn run(self) -> Result<(), BotError> {
        let Self { mut source, bot } = self;
        tracing::info!("Event relay started");

        loop {
            let Some(payload) = source.next().await? else {
                tracing::error!("Event stream closed");
                return Err(EventError::Closed.into());
            };
            deliver(bot.as_ref(), &payload).await;
        }
    }
}

/// Decode and send one payload. Failures are logged and skipped.
pub async fn deliver(bot: &dyn Bot, payload: &[u8]) -> bool {
    let reminder: Reminder = match serde_json::from_slice(payload) {
        Ok(reminder) => reminder,
        Err(e) => {
            tracing::warn!("Skipping undecodable reminder event: {}", e);
            return false;
        }
    };

    tracing::info!(
        "Reminder {} due for user {}: '{}'",
        reminder.id,
        reminder.user_telegram_id,
        reminder.name
    );

    let text = replies::reminder_due(&reminder.name);
    match bot.send_message(reminder.user_telegram_id, &text).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!("Failed to deliver reminder {}: {}", reminder.id, e);
            false
        }
    }
}
