use std::fmt;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static TIME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}):(\d{1,2})$").expect("time pattern is valid"));

/// Why a time-of-day string was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("expected HH:MM")]
    Format,

    #[error("hour {0} is out of range 0-23")]
    HourOutOfRange(u8),

    #[error("minute {0} is out of range 0-59")]
    MinuteOutOfRange(u8),
}

/// A validated time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReminderTime {
    hour: u8,
    minute: u8,
}

impl ReminderTime {
    pub const MAX_HOUR: u8 = 23;
    pub const MAX_MINUTE: u8 = 59;

    pub fn new(hour: u8, minute: u8) -> Result<Self, TimeParseError> {
        if hour > Self::MAX_HOUR {
            return Err(TimeParseError::HourOutOfRange(hour));
        }
        if minute > Self::MAX_MINUTE {
            return Err(TimeParseError::MinuteOutOfRange(minute));
        }
        Ok(Self { hour, minute })
    }

    /// Parse `H:M` where each field has one or two digits
    pub fn parse(input: &str) -> Result<Self, TimeParseError> {
        let caps = TIME_PATTERN
            .captures(input.trim())
            .ok_or(TimeParseError::Format)?;

        let hour = caps[1].parse::<u8>().map_err(|_| TimeParseError::Format)?;
        let minute = caps[2].parse::<u8>().map_err(|_| TimeParseError::Format)?;

        Self::new(hour, minute)
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }
}

impl fmt::Display for ReminderTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.hour, self.minute)
    }
}

/// Body of the backend's create-reminder call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateReminderRequest {
    user_telegram_id: i64,
    name: String,
    use_hour: u8,
    use_minute: u8,
}

impl CreateReminderRequest {
    /// Only a validated name and time can make a request.
    pub fn new(user_id: i64, name: impl Into<String>, time: ReminderTime) -> Self {
        Self {
            user_telegram_id: user_id,
            name: name.into(),
            use_hour: time.hour(),
            use_minute: time.minute(),
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user_telegram_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn time(&self) -> ReminderTime {
        ReminderTime {
            hour: self.use_hour,
            minute: self.use_minute,
        }
    }
}

/// A reminder as the backend publishes it when it falls due
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub user_telegram_id: i64,
    pub name: String,
    pub use_hour: u32,
    pub use_minute: u32,
}
