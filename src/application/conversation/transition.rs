//! Pure transition rules for the reminder creation flow
//!
//! `transition` does no I/O; [`super::ConversationMachine`] carries out the
//! returned [`Action`].

use crate::domain::entities::{Content, ConversationState, ReminderTime, TimeParseError};

/// A chat message classified for the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    Start,
    Create,
    UnknownCommand(&'a str),
    Text(&'a str),
}

impl<'a> Input<'a> {
    pub fn classify(content: &'a Content) -> Self {
        match content {
            Content::Command { name, .. } if name.eq_ignore_ascii_case("start") => Input::Start,
            Content::Command { name, .. } if name.eq_ignore_ascii_case("create") => Input::Create,
            Content::Command { name, .. } => Input::UnknownCommand(name),
            Content::Text(text) => Input::Text(text),
        }
    }
}

/// What the machine should do with one input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action<'a> {
    /// Nothing to do; no reply
    Ignore,
    /// Dispatch the greeting
    Greet,
    /// Start the flow by asking for a name
    PromptName,
    /// Blank name, ask again
    RepromptName,
    /// Store the name and ask for a time
    AcceptName(&'a str),
    /// Time is valid, create the reminder
    AcceptTime(ReminderTime),
    /// Time is invalid, ask again
    RejectTime(TimeParseError),
}

impl Action<'_> {
    /// State after the action has been carried out
    pub fn next_state(&self, current: ConversationState) -> ConversationState {
        match self {
            Action::Ignore | Action::Greet => current,
            Action::PromptName | Action::RepromptName => ConversationState::AwaitingName,
            Action::AcceptName(_) | Action::RejectTime(_) => ConversationState::AwaitingTime,
            Action::AcceptTime(_) => ConversationState::Default,
        }
    }
}

pub fn transition<'a>(state: ConversationState, input: &Input<'a>) -> Action<'a> {
    match (state, *input) {
        (_, Input::Start) => Action::Greet,
        (_, Input::Create) => Action::PromptName,
        (_, Input::UnknownCommand(_)) => Action::Ignore,

        (ConversationState::Default, Input::Text(_)) => Action::Ignore,

        (ConversationState::AwaitingName, Input::Text(text)) => {
            let name = text.trim();
            if name.is_empty() {
                Action::RepromptName
            } else {
                Action::AcceptName(name)
            }
        }

        (ConversationState::AwaitingTime, Input::Text(text)) => match ReminderTime::parse(text) {
            Ok(time) => Action::AcceptTime(time),
            Err(e) => Action::RejectTime(e),
        },
    }
}
