//! Stdout sink.

use async_trait::async_trait;
use rp_error::SinkError;
use rp_traits::Sink;
use std::io::{self, Write};

/// Sink that writes each payload to stdout, one per line.
///
/// Logging goes to stderr, so stdout stays a clean document stream.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Sink for StdoutSink {
    async fn send(&self, payload: &[u8]) -> Result<(), SinkError> {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(payload)
            .and_then(|()| stdout.write_all(b"\n"))
            .map_err(|error| SinkError::Io(error.to_string()))
    }
}
