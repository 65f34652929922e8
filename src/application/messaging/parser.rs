//! Message parser - Parses raw chat text into structured updates

use crate::domain::entities::{ChatUpdate, Content};

/// Parses incoming text into [`ChatUpdate`]s
pub struct MessageParser {
    command_prefix: String,
    bot_username: Option<String>,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
            bot_username: None,
        }
    }

    /// Accept `/command@username` addressed to this bot
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }

    /// Parse a text message
    pub fn parse(&self, chat_id: i64, user_id: i64, text: &str) -> ChatUpdate {
        ChatUpdate::new(chat_id, user_id, self.parse_content(text))
    }

    pub fn parse_content(&self, text: &str) -> Content {
        let Some(cmd_text) = self.strip_prefix(text) else {
            return Content::Text(text.to_string());
        };

        // Split command and arguments
        let mut parts = cmd_text.split_whitespace();
        let head = parts.next().unwrap_or("");
        let args = parts.map(|s| s.to_string()).collect();

        let name = match head.split_once('@') {
            Some((name, target)) => {
                if let Some(own) = &self.bot_username {
                    if !target.eq_ignore_ascii_case(own) {
                        // Addressed to another bot in a group chat
                        return Content::Text(text.to_string());
                    }
                }
                name
            }
            None => head,
        };

        Content::Command {
            name: name.to_lowercase(),
            args,
        }
    }

    fn strip_prefix<'a>(&self, text: &'a str) -> Option<&'a str> {
        let rest = text
            .strip_prefix('/')
            .or_else(|| match self.command_prefix.as_str() {
                "" => None,
                prefix => text.strip_prefix(prefix),
            })?;
        // A bare "/" or "/ something" is not a command
        match rest.chars().next() {
            Some(c) if !c.is_whitespace() => Some(rest),
            _ => None,
        }
    }
}

impl Default for MessageParser {
    fn default() -> Self {
        Self::new("/")
    }
}
