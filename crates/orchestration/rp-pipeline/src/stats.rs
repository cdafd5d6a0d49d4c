//! Statistics for pipeline runs.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one pipeline run.
///
/// Only the coordinator's control loop mutates these; atomics are used
/// so the progress reporter can read them concurrently without locking.
#[derive(Debug)]
pub struct PipelineStats {
    /// When the run started
    started_at: DateTime<Utc>,

    /// When the run completed
    completed_at: Mutex<Option<DateTime<Utc>>>,

    /// Rows converted into documents and queued
    rows_read: AtomicU64,

    /// Structurally invalid rows that were dropped
    rows_skipped: AtomicU64,

    /// Documents delivered to the sink
    documents_sent: AtomicU64,

    /// Payload bytes delivered to the sink
    bytes_sent: AtomicU64,
}

impl Default for PipelineStats {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStats {
    /// Creates a stats tracker with the current time as start time.
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            completed_at: Mutex::new(None),
            rows_read: AtomicU64::new(0),
            rows_skipped: AtomicU64::new(0),
            documents_sent: AtomicU64::new(0),
            bytes_sent: AtomicU64::new(0),
        }
    }

    pub fn record_row_read(&self) {
        self.rows_read.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_row_skipped(&self) {
        self.rows_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_document_sent(&self, bytes: u64) {
        self.documents_sent.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Marks the run as complete with the current time.
    pub fn complete(&self) {
        *self.completed_at.lock() = Some(Utc::now());
    }

    pub fn rows_read(&self) -> u64 {
        self.rows_read.load(Ordering::Relaxed)
    }

    pub fn rows_skipped(&self) -> u64 {
        self.rows_skipped.load(Ordering::Relaxed)
    }

    pub fn documents_sent(&self) -> u64 {
        self.documents_sent.load(Ordering::Relaxed)
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent.load(Ordering::Relaxed)
    }

    /// Takes a point-in-time copy of all counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            started_at: self.started_at,
            completed_at: *self.completed_at.lock(),
            rows_read: self.rows_read(),
            rows_skipped: self.rows_skipped(),
            documents_sent: self.documents_sent(),
            bytes_sent: self.bytes_sent(),
        }
    }
}

/// Serializable point-in-time copy of [`PipelineStats`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub rows_read: u64,
    pub rows_skipped: u64,
    pub documents_sent: u64,
    pub bytes_sent: u64,
}

impl StatsSnapshot {
    /// Wall-clock duration of the run, if it completed.
    pub fn duration(&self) -> Option<Duration> {
        self.completed_at
            .map(|completed| completed - self.started_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let stats = PipelineStats::new();
        stats.record_row_read();
        stats.record_row_read();
        stats.record_row_skipped();
        stats.record_document_sent(42);
        stats.record_document_sent(8);

        assert_eq!(stats.rows_read(), 2);
        assert_eq!(stats.rows_skipped(), 1);
        assert_eq!(stats.documents_sent(), 2);
        assert_eq!(stats.bytes_sent(), 50);
    }

    #[test]
    fn snapshot_reflects_completion() {
        let stats = PipelineStats::new();
        assert!(stats.snapshot().duration().is_none());

        stats.complete();
        let snapshot = stats.snapshot();
        assert!(snapshot.completed_at.is_some());
        assert!(snapshot.duration().is_some());
    }
}
