//! Domain entities - Core business objects with no external dependencies

pub mod command;
pub mod message;
pub mod reminder;
pub mod state;

pub use command::{Command, CommandKind, CreateReminder, Greet};
pub use message::{ChatUpdate, Content, OutgoingMessage};
pub use reminder::{CreateReminderRequest, Reminder, ReminderTime, TimeParseError};
pub use state::ConversationState;
