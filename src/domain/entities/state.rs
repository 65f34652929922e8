use std::fmt;

/// Where a user is in the reminder creation flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConversationState {
    #[default]
    Default,
    AwaitingName,
    AwaitingTime,
}

impl ConversationState {
    pub const ALL: [ConversationState; 3] = [
        ConversationState::Default,
        ConversationState::AwaitingName,
        ConversationState::AwaitingTime,
    ];

    /// Integer code persisted in the state store
    pub fn code(self) -> i64 {
        match self {
            ConversationState::Default => 0,
            ConversationState::AwaitingName => 1,
            ConversationState::AwaitingTime => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(ConversationState::Default),
            1 => Some(ConversationState::AwaitingName),
            2 => Some(ConversationState::AwaitingTime),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConversationState::Default => "default",
            ConversationState::AwaitingName => "awaiting_name",
            ConversationState::AwaitingTime => "awaiting_time",
        }
    }
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
