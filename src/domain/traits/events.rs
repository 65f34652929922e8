use async_trait::async_trait;
use crate::application::errors::EventError;

/// A source of raw due-reminder payloads
#[async_trait]
pub trait EventSource: Send {
    /// Wait for the next payload. `Ok(None)` means the source is exhausted.
    async fn next(&mut self) -> Result<Option<Vec<u8>>, EventError>;
}
