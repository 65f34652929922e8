//! HTTP client for the reminder backend

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::application::errors::{BotError, CommandError};
use crate::domain::entities::CreateReminderRequest;
use crate::domain::traits::ReminderBackend;

pub struct HttpReminderBackend {
    base_url: String,
    client: Client,
}

impl HttpReminderBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BotError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BotError::Network(format!("Failed to build backend client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn reminders_url(&self) -> String {
        format!("{}/api/tablets", self.base_url)
    }
}

/// Turn a non-success response into the text shown for it
fn failure_message(status: reqwest::StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("backend responded with {}", status)
    } else {
        body.to_string()
    }
}

#[async_trait]
impl ReminderBackend for HttpReminderBackend {
    async fn create_reminder(&self, request: &CreateReminderRequest) -> Result<(), CommandError> {
        let url = self.reminders_url();
        tracing::debug!("POST {} for user {}", url, request.user_id());

        let response = self.client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Could not reach backend: {}", e);
                CommandError::Backend(e.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        tracing::error!("Backend rejected reminder ({}): {}", status, body);
        Err(CommandError::Backend(failure_message(status, &body)))
    }
}
