//! Domain layer - Core business types with no I/O
//!
//! This layer contains:
//! - Entities: reminders, chat messages, commands, conversation state
//! - Traits: Abstractions for infrastructure (Bot, StateStore, ReminderBackend, EventSource)

pub mod entities;
pub mod traits;
