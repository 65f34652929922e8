//! Newline-delimited JSON event stream over HTTP
//!
//! `GET {url}/streams/{stream}?offset=newest` keeps the response open and
//! writes one JSON document per line as events are published. Only events
//! published after the subscription are delivered.

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::Client;
use std::collections::VecDeque;

use crate::application::errors::EventError;
use crate::domain::traits::EventSource;

/// Splits a byte stream into non-empty lines
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
    ready: VecDeque<Vec<u8>>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) {
        for &byte in chunk {
            if byte == b'\n' {
                let line = std::mem::take(&mut self.pending);
                self.enqueue(line);
            } else {
                self.pending.push(byte);
            }
        }
    }

    pub fn pop(&mut self) -> Option<Vec<u8>> {
        self.ready.pop_front()
    }

    /// Flush a final line that had no trailing newline
    pub fn finish(&mut self) {
        let line = std::mem::take(&mut self.pending);
        self.enqueue(line);
    }

    fn enqueue(&mut self, mut line: Vec<u8>) {
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        if line.iter().any(|b| !b.is_ascii_whitespace()) {
            self.ready.push_back(line);
        }
    }
}

pub struct HttpEventStream {
    body: BoxStream<'static, reqwest::Result<Vec<u8>>>,
    lines: LineBuffer,
    finished: bool,
}

impl HttpEventStream {
    pub fn stream_url(base_url: &str, stream: &str) -> String {
        format!(
            "{}/streams/{}?offset=newest",
            base_url.trim_end_matches('/'),
            stream
        )
    }

    /// Subscribe to `stream` from the newest offset
    pub async fn connect(base_url: &str, stream: &str) -> Result<Self, EventError> {
        let url = Self::stream_url(base_url, stream);
        tracing::info!("Subscribing to event stream {}", url);

        let response = Client::new()
            .get(&url)
            .header("Accept", "application/x-ndjson")
            .send()
            .await
            .map_err(|e| EventError::Connect(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EventError::Connect(format!("{} {}", status, body.trim())));
        }

        Ok(Self {
            body: response
                .bytes_stream()
                .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
                .boxed(),
            lines: LineBuffer::new(),
            finished: false,
        })
    }
}

#[async_trait]
impl EventSource for HttpEventStream {
    async fn next(&mut self) -> Result<Option<Vec<u8>>, EventError> {
        loop {
            if let Some(line) = self.lines.pop() {
                return Ok(Some(line));
            }
            if self.finished {
                return Ok(None);
            }

            match self.body.next().await {
                Some(Ok(chunk)) => self.lines.push(&chunk),
                Some(Err(e)) => return Err(EventError::Stream(e.to_string())),
                None => {
                    self.finished = true;
                    self.lines.finish();
                }
            }
        }
    }
}
