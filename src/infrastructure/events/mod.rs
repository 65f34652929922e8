//! Event stream sources for the reminder relay

pub mod http;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::application::errors::EventError;
use crate::domain::traits::EventSource;

pub use http::HttpEventStream;

/// In-process source fed through a channel. Closes when every sender is dropped.
pub struct ChannelEventSource {
    receiver: mpsc::Receiver<Vec<u8>>,
}

impl ChannelEventSource {
    pub fn new(buffer: usize) -> (mpsc::Sender<Vec<u8>>, Self) {
        let (sender, receiver) = mpsc::channel(buffer);
        (sender, Self { receiver })
    }
}

#[async_trait]
impl EventSource for ChannelEventSource {
    async fn next(&mut self) -> Result<Option<Vec<u8>>, EventError> {
        Ok(self.receiver.recv().await)
    }
}
