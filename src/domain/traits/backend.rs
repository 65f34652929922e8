use async_trait::async_trait;
use crate::application::errors::CommandError;
use crate::domain::entities::CreateReminderRequest;

/// The service that owns reminders and schedules them
#[async_trait]
pub trait ReminderBackend: Send + Sync {
    /// Persist a new reminder. The error carries the backend's own message.
    async fn create_reminder(&self, request: &CreateReminderRequest) -> Result<(), CommandError>;
}
