//! Conversation - the per-user reminder creation flow

pub mod machine;
pub mod session;
pub mod transition;

pub use machine::{ConversationMachine, Outcome};
pub use session::{Session, UserSessions};
pub use transition::{transition, Action, Input};
