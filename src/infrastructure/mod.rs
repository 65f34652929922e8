//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Storage: Conversation state persistence (SQLite, in-memory)
//! - Adapters: Platform integrations (Telegram)
//! - Backend: HTTP client for the reminder service
//! - Events: Due-reminder event stream sources

pub mod adapters;
pub mod backend;
pub mod config;
pub mod events;
pub mod storage;
