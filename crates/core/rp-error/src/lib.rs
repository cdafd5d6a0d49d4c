//! Error types and severity classification for rowpush.
//!
//! This crate provides:
//! - [`PushError`] - Top-level error enum for all pipeline errors
//! - Domain-specific errors ([`RowError`], [`ReadError`], [`SinkError`], [`StoreError`])
//! - [`Severity`] for abort-vs-continue decision making
//! - Classification logic mapping each error to its blast radius

use thiserror::Error;

/// Top-level error type for rowpush.
#[derive(Error, Debug)]
pub enum PushError {
    /// Input errors (CSV decoding, underlying I/O)
    #[error("read error: {0}")]
    Read(#[from] ReadError),

    /// Sink errors (stdout write, HTTP POST, store write)
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    /// Point store errors (timestamp parsing, write, query)
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Run aborted on a fatal task error; `row` is the data row index
    /// the failing task was handling
    #[error("aborted at row {row}: {source}")]
    Aborted {
        row: u64,
        #[source]
        source: Box<PushError>,
    },

    /// Generic errors (wrapped anyhow)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Row-local structural errors. These drop a single row and never abort
/// the run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    /// Record width does not match the captured header width
    #[error("record has {actual} fields, header has {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Document failed to serialize to JSON
    #[error("serialization failed: {0}")]
    Serialize(String),
}

/// Errors surfaced by the row transformer.
#[derive(Error, Debug)]
pub enum ReadError {
    /// Structural error local to one row; the row is skipped
    #[error("skipped malformed row ({0})")]
    Row(#[from] RowError),

    /// CSV decoding failed (malformed quoting, invalid UTF-8)
    #[error("CSV decode failed: {0}")]
    Csv(String),

    /// I/O failure in the underlying reader
    #[error("I/O error: {0}")]
    Io(String),
}

/// Sink-related errors.
#[derive(Error, Debug)]
pub enum SinkError {
    /// Writing to the output stream failed
    #[error("write failed: {0}")]
    Io(String),

    /// HTTP transport failure (connect, DNS, timeout)
    #[error("transport failed: {0}")]
    Transport(String),

    /// HTTP endpoint answered outside the 2xx range
    #[error("response status {0}")]
    Status(u16),

    /// Payload could not be decoded into the expected document shape
    #[error("malformed payload: {0}")]
    Payload(String),

    /// Backing point store rejected the write
    #[error("store write failed: {0}")]
    Store(#[from] StoreError),
}

/// Point-store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Event timestamp could not be parsed
    #[error("invalid timestamp {value:?}: {reason}")]
    Timestamp { value: String, reason: String },

    /// Writing points failed
    #[error("write failed: {0}")]
    Write(String),

    /// Range query failed
    #[error("query failed: {0}")]
    Query(String),
}

/// Blast radius of an error.
///
/// Used by the reader task and the coordinator to decide between
/// dropping one row and aborting the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The affected row is dropped; the run continues
    RowLocal,
    /// The run aborts
    Fatal,
}

/// Classifies a transformer error.
///
/// Shape mismatches and serialization failures only lose one row; CSV
/// decode errors and I/O failures poison the input stream and abort.
pub fn classify_read_error(error: &ReadError) -> Severity {
    match error {
        ReadError::Row(_) => Severity::RowLocal,
        ReadError::Csv(_) => Severity::Fatal,
        ReadError::Io(_) => Severity::Fatal,
    }
}

/// Result type alias using PushError.
pub type Result<T> = std::result::Result<T, PushError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_is_row_local() {
        let error = ReadError::Row(RowError::ShapeMismatch {
            expected: 3,
            actual: 2,
        });
        assert_eq!(classify_read_error(&error), Severity::RowLocal);
    }

    #[test]
    fn serialize_failure_is_row_local() {
        let error = ReadError::Row(RowError::Serialize("bad value".to_string()));
        assert_eq!(classify_read_error(&error), Severity::RowLocal);
    }

    #[test]
    fn csv_decode_is_fatal() {
        let error = ReadError::Csv("unterminated quote".to_string());
        assert_eq!(classify_read_error(&error), Severity::Fatal);
    }

    #[test]
    fn io_failure_is_fatal() {
        let error = ReadError::Io("unexpected EOF".to_string());
        assert_eq!(classify_read_error(&error), Severity::Fatal);
    }

    #[test]
    fn aborted_display_carries_row_and_cause() {
        let error = PushError::Aborted {
            row: 42,
            source: Box::new(PushError::Sink(SinkError::Status(500))),
        };
        let message = error.to_string();
        assert!(message.contains("row 42"));
        assert!(message.contains("response status 500"));
    }

    #[test]
    fn row_error_display() {
        let error = RowError::ShapeMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(error.to_string(), "record has 2 fields, header has 3");
    }
}
