/// Message content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Command { name: String, args: Vec<String> },
}

impl Content {
    pub fn is_command(&self) -> bool {
        matches!(self, Content::Command { .. })
    }
}

/// An incoming chat message, already stripped of transport details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatUpdate {
    /// Chat the reply goes to
    pub chat_id: i64,
    /// Sender; conversation state is keyed by this
    pub user_id: i64,
    pub content: Content,
}

impl ChatUpdate {
    pub fn new(chat_id: i64, user_id: i64, content: Content) -> Self {
        Self {
            chat_id,
            user_id,
            content,
        }
    }

    pub fn text(chat_id: i64, user_id: i64, text: impl Into<String>) -> Self {
        Self::new(chat_id, user_id, Content::Text(text.into()))
    }

    pub fn command(chat_id: i64, user_id: i64, name: impl Into<String>) -> Self {
        Self::new(
            chat_id,
            user_id,
            Content::Command {
                name: name.into(),
                args: Vec::new(),
            },
        )
    }
}

/// A message the bot should send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub chat_id: i64,
    pub text: String,
}

impl OutgoingMessage {
    pub fn new(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
        }
    }
}
