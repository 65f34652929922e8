use async_trait::async_trait;

use super::registry::{Handler, HandlerResult, Request};
use crate::application::replies;
use crate::domain::entities::{Command, CommandKind, Greet, OutgoingMessage};

impl Request for Greet {
    const KIND: CommandKind = CommandKind::Greet;

    fn into_command(self) -> Command {
        Command::Greet(self)
    }

    fn from_command(command: Command) -> Option<Self> {
        match command {
            Command::Greet(greet) => Some(greet),
            _ => None,
        }
    }
}

/// Replies to /start with the onboarding text
#[derive(Debug, Default, Clone)]
pub struct GreetHandler;

impl GreetHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Handler for GreetHandler {
    type Request = Greet;

    async fn handle(&self, request: Greet) -> HandlerResult {
        Ok(OutgoingMessage::new(request.chat_id, replies::GREETING))
    }
}
