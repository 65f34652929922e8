//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Commands: typed requests, handlers and the registry
//! - Conversation: the per-user state machine
//! - Relay: due-reminder event delivery
//! - Messaging: message parsing
//! - Errors: Domain-specific errors

pub mod commands;
pub mod conversation;
pub mod errors;
pub mod messaging;
pub mod relay;
pub mod replies;
