//! Domain traits - Abstractions for infrastructure implementations

pub mod backend;
pub mod bot;
pub mod events;
pub mod store;

pub use backend::ReminderBackend;
pub use bot::{Bot, BotInfo};
pub use events::EventSource;
pub use store::StateStore;
