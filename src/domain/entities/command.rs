use std::fmt;

use super::CreateReminderRequest;

/// Discriminant of [`Command`], used as the registry key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Greet,
    CreateReminder,
}

impl CommandKind {
    pub const ALL: [CommandKind; 2] = [CommandKind::Greet, CommandKind::CreateReminder];

    pub fn as_str(self) -> &'static str {
        match self {
            CommandKind::Greet => "greet",
            CommandKind::CreateReminder => "create_reminder",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Onboarding greeting for a chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Greet {
    pub chat_id: i64,
}

impl Greet {
    pub fn new(chat_id: i64) -> Self {
        Self { chat_id }
    }
}

/// Ask the backend to store a reminder whose name and time are validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateReminder {
    pub chat_id: i64,
    pub user_id: i64,
    pub draft: CreateReminderRequest,
}

impl CreateReminder {
    pub fn new(chat_id: i64, user_id: i64, draft: CreateReminderRequest) -> Self {
        Self {
            chat_id,
            user_id,
            draft,
        }
    }
}

/// One user intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Greet(Greet),
    CreateReminder(CreateReminder),
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Greet(_) => CommandKind::Greet,
            Command::CreateReminder(_) => CommandKind::CreateReminder,
        }
    }
}
