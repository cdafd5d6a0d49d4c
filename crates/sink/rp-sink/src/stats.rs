//! Counting sink for throughput runs.

use async_trait::async_trait;
use rp_error::SinkError;
use rp_traits::Sink;
use std::sync::atomic::{AtomicU64, Ordering};

/// Sink that counts documents and bytes without producing output.
///
/// Useful for measuring pipeline throughput with the dispatch cost
/// removed, and as a mock in tests.
#[derive(Debug, Default)]
pub struct StatsSink {
    documents: AtomicU64,
    bytes: AtomicU64,
}

impl StatsSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> u64 {
        self.documents.load(Ordering::Relaxed)
    }

    pub fn bytes(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Sink for StatsSink {
    async fn send(&self, payload: &[u8]) -> Result<(), SinkError> {
        self.documents.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(payload.len() as u64, Ordering::Relaxed);
        Ok(())
    }
}
