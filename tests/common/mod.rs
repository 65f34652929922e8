//! Shared fakes for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tablet_bot::application::commands::{CommandRegistry, CreateReminderHandler, GreetHandler};
use tablet_bot::application::conversation::{ConversationMachine, UserSessions};
use tablet_bot::application::errors::{BotError, CommandError};
use tablet_bot::domain::entities::CreateReminderRequest;
use tablet_bot::domain::traits::{Bot, ReminderBackend, StateStore};
use tablet_bot::infrastructure::storage::MemoryStateStore;

/// Bot that records every message instead of sending it
#[derive(Default)]
pub struct RecordingBot {
    sent: Mutex<Vec<(i64, String)>>,
}

impl RecordingBot {
    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_text(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|(_, text)| text.clone())
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), BotError> {
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }
}

/// Backend that records requests and optionally rejects them
#[derive(Default)]
pub struct FakeBackend {
    requests: Mutex<Vec<CreateReminderRequest>>,
    failure: Option<String>,
}

impl FakeBackend {
    pub fn failing(message: &str) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            failure: Some(message.to_string()),
        }
    }

    pub fn requests(&self) -> Vec<CreateReminderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReminderBackend for FakeBackend {
    async fn create_reminder(&self, request: &CreateReminderRequest) -> Result<(), CommandError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.failure {
            Some(message) => Err(CommandError::Backend(message.clone())),
            None => Ok(()),
        }
    }
}

pub struct Harness {
    pub machine: ConversationMachine,
    pub store: Arc<MemoryStateStore>,
    pub backend: Arc<FakeBackend>,
    pub bot: RecordingBot,
}

pub fn harness(backend: FakeBackend) -> Harness {
    harness_with_ttl(backend, None)
}

pub fn harness_with_ttl(backend: FakeBackend, ttl: Option<Duration>) -> Harness {
    let store = Arc::new(MemoryStateStore::new());
    let backend = Arc::new(backend);

    let registry = CommandRegistry::builder()
        .register(GreetHandler::new())
        .register(CreateReminderHandler::new(backend.clone()))
        .build();

    let sessions = UserSessions::new(
        store.clone() as Arc<dyn StateStore>,
        Duration::from_secs(1),
        ttl,
    );

    Harness {
        machine: ConversationMachine::new(sessions, Arc::new(registry)),
        store,
        backend,
        bot: RecordingBot::default(),
    }
}
