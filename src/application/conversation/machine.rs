//! Conversation state machine - turns chat updates into replies and dispatches

use std::sync::Arc;

use super::session::UserSessions;
use super::transition::{transition, Action, Input};
use crate::application::commands::CommandRegistry;
use crate::application::errors::{BotError, CommandError};
use crate::application::replies;
use crate::domain::entities::{ChatUpdate, CreateReminder, CreateReminderRequest, Greet, OutgoingMessage};
use crate::domain::traits::Bot;

/// Result of handling one update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to send
    Ignored,
    /// Answered directly by the machine
    Replied(OutgoingMessage),
    /// Answered by a command handler
    Dispatched(OutgoingMessage),
}

impl Outcome {
    pub fn message(&self) -> Option<&OutgoingMessage> {
        match self {
            Outcome::Ignored => None,
            Outcome::Replied(msg) | Outcome::Dispatched(msg) => Some(msg),
        }
    }
}

pub struct ConversationMachine {
    sessions: UserSessions,
    registry: Arc<CommandRegistry>,
    expose_backend_errors: bool,
}

impl ConversationMachine {
    pub fn new(sessions: UserSessions, registry: Arc<CommandRegistry>) -> Self {
        Self {
            sessions,
            registry,
            expose_backend_errors: true,
        }
    }

    /// Show backend error text to users (default) or a generic failure reply
    pub fn with_backend_errors_exposed(mut self, expose: bool) -> Self {
        self.expose_backend_errors = expose;
        self
    }

    /// Handle one update. State writes finish before the reply is returned.
    pub async fn handle(&self, update: &ChatUpdate) -> Result<Outcome, BotError> {
        let session = self.sessions.load(update.user_id).await?;
        let input = Input::classify(&update.content);
        let action = transition(session.state, &input);

        tracing::debug!(
            "[{}] user {} in {} -> {:?}",
            update.chat_id,
            update.user_id,
            session.state,
            action
        );

        let chat_id = update.chat_id;
        let user_id = update.user_id;
        let next = action.next_state(session.state);

        match action {
            Action::Ignore => Ok(Outcome::Ignored),

            Action::Greet => {
                let reply = self.dispatch_reply(chat_id, self.registry.invoke(Greet::new(chat_id)).await);
                Ok(Outcome::Dispatched(reply))
            }

            Action::PromptName => {
                self.sessions.save_state(user_id, next).await?;
                Ok(Outcome::Replied(OutgoingMessage::new(chat_id, replies::ASK_NAME)))
            }

            Action::RepromptName => Ok(Outcome::Replied(OutgoingMessage::new(chat_id, replies::ASK_NAME))),

            Action::AcceptName(name) => {
                self.sessions.save_draft(user_id, name).await?;
                self.sessions.save_state(user_id, next).await?;
                Ok(Outcome::Replied(OutgoingMessage::new(chat_id, replies::ASK_TIME)))
            }

            Action::RejectTime(e) => {
                tracing::debug!("[{}] rejected time: {}", chat_id, e);
                Ok(Outcome::Replied(OutgoingMessage::new(chat_id, replies::INVALID_TIME)))
            }

            Action::AcceptTime(time) => {
                self.sessions.save_state(user_id, next).await?;

                let Some(name) = session.draft_name else {
                    tracing::warn!("No draft name stored for user {}, restarting flow", user_id);
                    return Ok(Outcome::Replied(OutgoingMessage::new(chat_id, replies::DRAFT_LOST)));
                };

                let request = CreateReminder::new(
                    chat_id,
                    user_id,
                    CreateReminderRequest::new(user_id, name, time),
                );
                let reply = self.dispatch_reply(chat_id, self.registry.invoke(request).await);

                // A leftover draft is unreachable from Default and is overwritten by the next name
                if let Err(e) = self.sessions.clear_draft(user_id).await {
                    tracing::warn!("Could not clear draft for user {}: {}", user_id, e);
                }
                Ok(Outcome::Dispatched(reply))
            }
        }
    }

    /// Handle an update and send its reply. Failures are logged and the update
    /// is dropped; the user can simply send the message again.
    pub async fn process(&self, bot: &dyn Bot, update: &ChatUpdate) -> Outcome {
        let outcome = match self.handle(update).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("[{}] Skipping update from user {}: {}", update.chat_id, update.user_id, e);
                return Outcome::Ignored;
            }
        };

        if let Some(reply) = outcome.message() {
            tracing::info!("Sending response to chat_id {}: {}", reply.chat_id, preview(&reply.text));
            if let Err(e) = bot.send_message(reply.chat_id, &reply.text).await {
                tracing::error!("Failed to send message: {}", e);
            }
        }
        outcome
    }

    fn dispatch_reply(&self, chat_id: i64, result: Result<OutgoingMessage, CommandError>) -> OutgoingMessage {
        match result {
            Ok(reply) => reply,
            Err(e) if self.expose_backend_errors => OutgoingMessage::new(chat_id, e.to_string()),
            Err(_) => OutgoingMessage::new(chat_id, replies::BACKEND_FAILED),
        }
    }
}

fn preview(text: &str) -> String {
    text.chars().take(100).collect()
}
