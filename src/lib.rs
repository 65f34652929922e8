//! tablet-bot - Telegram reminders for taking tablets
//!
//! Users create a reminder through a short chat flow (`/create`, a name, a
//! time). The reminder backend stores it and later publishes a due event,
//! which the relay turns into a chat message.

pub mod application;
pub mod domain;
pub mod infrastructure;
