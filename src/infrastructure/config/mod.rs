//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use crate::application::errors::ConfigError;

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub backend: BackendConfig,
    pub store: StoreConfig,
    pub events: EventsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
    /// Telegram bot token
    pub token: Option<String>,
    pub poll_timeout_seconds: u64,
    /// Show the backend's error text to users when creating a reminder fails
    pub expose_backend_errors: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BackendConfig {
    /// Base URL; reminders are POSTed to `{url}/api/tablets`
    pub url: Option<String>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct StoreConfig {
    /// `sqlite://<path>`, a bare path, or `memory://`
    pub uri: Option<String>,
    pub timeout_ms: u64,
    /// Conversation state expires after this long; 0 disables expiry
    pub state_ttl_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct EventsConfig {
    pub url: Option<String>,
    pub stream: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "tablet-bot".to_string(),
            prefix: "/".to_string(),
            token: None,
            poll_timeout_seconds: 30,
            expose_backend_errors: true,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_seconds: 10,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: None,
            timeout_ms: 5000,
            state_ttl_seconds: 86400,
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            url: None,
            stream: "TabletsSchedule".to_string(),
        }
    }
}

/// Longest accepted `store.state-ttl-seconds` (one year)
pub const MAX_STATE_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

/// Where conversation state lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Sqlite(PathBuf),
    Memory,
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn state_ttl(&self) -> Option<Duration> {
        match self.state_ttl_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn location(&self) -> Result<StoreLocation, ConfigError> {
        let uri = self.uri.as_deref()
            .ok_or_else(|| ConfigError::MissingField("store.uri".to_string()))?;

        if uri == "memory://" {
            return Ok(StoreLocation::Memory);
        }

        let path = uri.strip_prefix("sqlite://").unwrap_or(uri);
        if path.is_empty() || path.contains("://") {
            return Err(ConfigError::InvalidValue(format!("unsupported store uri: {}", uri)));
        }
        Ok(StoreLocation::Sqlite(PathBuf::from(path)))
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Override fields from environment variables that are set
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| std::env::var(name).ok());
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(token) = var("TELEGRAM_API_TOKEN") {
            self.bot.token = Some(token);
        }
        if let Some(prefix) = var("BOT_PREFIX") {
            self.bot.prefix = prefix;
        }
        if let Some(url) = var("BACKEND_URL") {
            self.backend.url = Some(url);
        }
        if let Some(uri) = var("STORE_URI") {
            self.store.uri = Some(uri);
        }
        if let Some(url) = var("EVENTS_URL") {
            self.events.url = Some(url);
        }
        if let Some(stream) = var("EVENTS_STREAM") {
            self.events.stream = stream;
        }
    }

    /// Check every value needed to start is present
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn required(value: &Option<String>, field: &str) -> Result<(), ConfigError> {
            match value.as_deref().map(str::trim) {
                Some(v) if !v.is_empty() => Ok(()),
                _ => Err(ConfigError::MissingField(field.to_string())),
            }
        }

        required(&self.bot.token, "bot.token")?;
        required(&self.backend.url, "backend.url")?;
        required(&self.store.uri, "store.uri")?;
        required(&self.events.url, "events.url")?;

        if self.events.stream.trim().is_empty() {
            return Err(ConfigError::MissingField("events.stream".to_string()));
        }
        if self.store.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue("store.timeout-ms must be positive".to_string()));
        }
        if self.store.state_ttl_seconds > MAX_STATE_TTL_SECONDS {
            return Err(ConfigError::InvalidValue(format!(
                "store.state-ttl-seconds must be at most {}",
                MAX_STATE_TTL_SECONDS
            )));
        }
        self.store.location()?;

        Ok(())
    }
}
