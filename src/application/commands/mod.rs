//! Commands - typed requests, their handlers, and the registry routing between them

pub mod create_reminder;
pub mod greet;
pub mod registry;

pub use create_reminder::CreateReminderHandler;
pub use greet::GreetHandler;
pub use registry::{CommandRegistry, Handler, HandlerResult, RegistryBuilder, Request};
