use std::sync::Arc;

use async_trait::async_trait;

use super::registry::{Handler, HandlerResult, Request};
use crate::application::replies;
use crate::domain::entities::{Command, CommandKind, CreateReminder, OutgoingMessage};
use crate::domain::traits::ReminderBackend;

impl Request for CreateReminder {
    const KIND: CommandKind = CommandKind::CreateReminder;

    fn into_command(self) -> Command {
        Command::CreateReminder(self)
    }

    fn from_command(command: Command) -> Option<Self> {
        match command {
            Command::CreateReminder(create) => Some(create),
            _ => None,
        }
    }
}

/// Stores a validated reminder through the backend
pub struct CreateReminderHandler {
    backend: Arc<dyn ReminderBackend>,
}

impl CreateReminderHandler {
    pub fn new(backend: Arc<dyn ReminderBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Handler for CreateReminderHandler {
    type Request = CreateReminder;

    async fn handle(&self, request: CreateReminder) -> HandlerResult {
        if let Err(e) = self.backend.create_reminder(&request.draft).await {
            tracing::error!("Could not create reminder for user {}: {}", request.user_id, e);
            return Err(e);
        }

        tracing::info!(
            "Created reminder '{}' at {} for user {}",
            request.draft.name(),
            request.draft.time(),
            request.user_id
        );
        Ok(OutgoingMessage::new(
            request.chat_id,
            replies::reminder_created(request.draft.time()),
        ))
    }
}
