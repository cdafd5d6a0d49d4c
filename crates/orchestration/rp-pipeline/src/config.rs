//! Configuration types for the pipeline.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default data-channel capacity.
pub const DEFAULT_BUFFER_SIZE: usize = 1;

/// Default sender concurrency.
pub const DEFAULT_CONCURRENCY: usize = 1;

/// Default time to wait for sender tasks after the run finished.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Data-channel capacity per sender (>= 1). The reader blocks on a
    /// full buffer; this is the backpressure mechanism.
    pub buffer_size: usize,

    /// Number of concurrent sender tasks (>= 1). With more than one
    /// sender, delivery order across rows is not guaranteed.
    pub concurrency: usize,

    /// Maximum number of data rows to read; `None` reads to exhaustion.
    pub row_limit: Option<u64>,

    /// Time to wait for sender tasks to wind down after completion
    #[serde(with = "humantime_serde")]
    pub shutdown_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
            row_limit: None,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the data-channel capacity (clamped to >= 1).
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    /// Sets the sender concurrency (clamped to >= 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Sets the row limit.
    pub fn with_row_limit(mut self, row_limit: Option<u64>) -> Self {
        self.row_limit = row_limit;
        self
    }

    /// Sets the shutdown timeout.
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sequential() {
        let config = PipelineConfig::default();
        assert_eq!(config.buffer_size, 1);
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.row_limit, None);
    }

    #[test]
    fn builder_clamps_to_one() {
        let config = PipelineConfig::new()
            .with_buffer_size(0)
            .with_concurrency(0);
        assert_eq!(config.buffer_size, 1);
        assert_eq!(config.concurrency, 1);
    }

    #[test]
    fn config_round_trips_through_serde() {
        let config = PipelineConfig::new()
            .with_concurrency(4)
            .with_row_limit(Some(100));
        let json = serde_json::to_string(&config).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.concurrency, 4);
        assert_eq!(back.row_limit, Some(100));
    }
}
