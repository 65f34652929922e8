//! Command registry - routes typed requests to their handlers
//!
//! Handlers are registered once through [`RegistryBuilder`] before the update
//! loop starts. The built [`CommandRegistry`] is immutable and shared by
//! `Arc`, so concurrent dispatch needs no locking.

use std::collections::HashMap;
use std::marker::PhantomData;

use async_trait::async_trait;

use crate::application::errors::CommandError;
use crate::domain::entities::{Command, CommandKind, OutgoingMessage};

/// Handler result
pub type HandlerResult = Result<OutgoingMessage, CommandError>;

/// A typed request that travels through the registry as a [`Command`]
pub trait Request: Send + Sized + 'static {
    const KIND: CommandKind;

    fn into_command(self) -> Command;

    fn from_command(command: Command) -> Option<Self>;
}

/// Handles exactly one request type
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    type Request: Request;

    async fn handle(&self, request: Self::Request) -> HandlerResult;
}

#[async_trait]
trait ErasedHandler: Send + Sync {
    async fn call(&self, command: Command) -> HandlerResult;
}

struct Typed<H: Handler> {
    handler: H,
    _request: PhantomData<fn(H::Request)>,
}

#[async_trait]
impl<H: Handler> ErasedHandler for Typed<H> {
    async fn call(&self, command: Command) -> HandlerResult {
        let kind = command.kind();
        match H::Request::from_command(command) {
            Some(request) => self.handler.handle(request).await,
            None => panic!(
                "command registry corrupted: {} command routed to the {} handler",
                kind,
                H::Request::KIND
            ),
        }
    }
}

/// Collects handlers at startup
#[derive(Default)]
pub struct RegistryBuilder {
    handlers: HashMap<CommandKind, Box<dyn ErasedHandler>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for its request type, replacing any earlier one
    pub fn register<H: Handler>(mut self, handler: H) -> Self {
        let kind = H::Request::KIND;
        let typed = Typed {
            handler,
            _request: PhantomData,
        };
        if self.handlers.insert(kind, Box::new(typed)).is_some() {
            tracing::debug!("Replaced handler for {} command", kind);
        }
        self
    }

    pub fn build(self) -> CommandRegistry {
        tracing::info!("Command registry built with {} handlers", self.handlers.len());
        CommandRegistry {
            handlers: self.handlers,
        }
    }
}

/// Immutable dispatch table from command kind to handler
pub struct CommandRegistry {
    handlers: HashMap<CommandKind, Box<dyn ErasedHandler>>,
}

impl CommandRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Dispatch a request to its handler.
    ///
    /// # Panics
    ///
    /// Panics when no handler was registered for the request's kind. That
    /// only happens when startup wiring is incomplete.
    pub async fn invoke<R: Request>(&self, request: R) -> HandlerResult {
        let Some(handler) = self.handlers.get(&R::KIND) else {
            panic!("no handler registered for {} command", R::KIND);
        };
        handler.call(request.into_command()).await
    }

    pub fn is_registered(&self, kind: CommandKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Command kinds that have no handler
    pub fn missing(&self) -> Vec<CommandKind> {
        CommandKind::ALL
            .into_iter()
            .filter(|kind| !self.is_registered(*kind))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{CreateReminder, CreateReminderRequest, Greet, ReminderTime};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingGreet {
        calls: Arc<AtomicUsize>,
        reply: &'static str,
    }

    #[async_trait]
    impl Handler for CountingGreet {
        type Request = Greet;

        async fn handle(&self, request: Greet) -> HandlerResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(OutgoingMessage::new(request.chat_id, self.reply))
        }
    }

    fn create_request() -> CreateReminder {
        let time = ReminderTime::new(8, 0).unwrap();
        CreateReminder::new(1, 1, CreateReminderRequest::new(1, "Iron", time))
    }

    #[tokio::test]
    async fn test_invoke_reaches_handler_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = CommandRegistry::builder()
            .register(CountingGreet { calls: calls.clone(), reply: "hi" })
            .build();

        let reply = registry.invoke(Greet::new(99)).await.unwrap();

        assert_eq!(reply, OutgoingMessage::new(99, "hi"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reregistering_replaces_handler() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let registry = CommandRegistry::builder()
            .register(CountingGreet { calls: first.clone(), reply: "first" })
            .register(CountingGreet { calls: second.clone(), reply: "second" })
            .build();

        let reply = registry.invoke(Greet::new(1)).await.unwrap();

        assert_eq!(reply.text, "second");
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    #[should_panic(expected = "no handler registered for create_reminder command")]
    async fn test_invoke_unregistered_panics() {
        let registry = CommandRegistry::builder()
            .register(CountingGreet { calls: Arc::new(AtomicUsize::new(0)), reply: "hi" })
            .build();

        let _ = registry.invoke(create_request()).await;
    }

    #[test]
    fn test_missing_lists_unregistered_kinds() {
        let empty = CommandRegistry::builder().build();
        assert!(empty.is_empty());
        assert_eq!(empty.missing(), CommandKind::ALL.to_vec());

        let partial = CommandRegistry::builder()
            .register(CountingGreet { calls: Arc::new(AtomicUsize::new(0)), reply: "hi" })
            .build();
        assert_eq!(partial.missing(), vec![CommandKind::CreateReminder]);
    }
}
