//! Messages exchanged over the pipeline's two channels.
//!
//! Data messages flow reader -> senders over the bounded data channel;
//! control messages flow reader/senders -> coordinator over the
//! unbounded control channel.

use rp_error::{PushError, RowError};

/// Which task produced a control message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOrigin {
    /// The single reader task
    Reader,
    /// One of the C sender tasks
    Sender,
}

impl std::fmt::Display for TaskOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reader => write!(f, "reader"),
            Self::Sender => write!(f, "sender"),
        }
    }
}

/// One serialized document heading for a sink.
#[derive(Debug, Clone)]
pub struct DataMessage {
    /// Serialized JSON document
    pub payload: Vec<u8>,

    /// Data row index this document was built from (0-based, counts
    /// skipped rows, ignores header rows)
    pub row: u64,
}

/// What a control message reports.
#[derive(Debug)]
pub enum ControlEvent {
    /// The reader converted and queued one row
    RowRead,

    /// The reader dropped one structurally invalid row
    RowSkipped(RowError),

    /// One sender delivered one document
    DocumentSent { bytes: u64 },

    /// A task hit an unrecoverable error; the run must abort
    Fatal(PushError),

    /// Terminal reader message: input is exhausted (or the row limit was
    /// reached). `rows_read` counts every data row attempt, including
    /// skipped rows.
    EndOfInput { rows_read: u64 },

    /// Terminal sender sentinel: the data channel is closed and drained
    EndOfSending,
}

/// Status report from the reader or a sender to the coordinator.
#[derive(Debug)]
pub struct ControlMessage {
    pub origin: TaskOrigin,

    /// Row index the report refers to. The only way to tie a report back
    /// to its row when senders run concurrently.
    pub row: u64,

    pub event: ControlEvent,
}

impl ControlMessage {
    pub fn row_read(row: u64) -> Self {
        Self {
            origin: TaskOrigin::Reader,
            row,
            event: ControlEvent::RowRead,
        }
    }

    pub fn row_skipped(row: u64, error: RowError) -> Self {
        Self {
            origin: TaskOrigin::Reader,
            row,
            event: ControlEvent::RowSkipped(error),
        }
    }

    pub fn document_sent(row: u64, bytes: u64) -> Self {
        Self {
            origin: TaskOrigin::Sender,
            row,
            event: ControlEvent::DocumentSent { bytes },
        }
    }

    pub fn fatal(origin: TaskOrigin, row: u64, error: PushError) -> Self {
        Self {
            origin,
            row,
            event: ControlEvent::Fatal(error),
        }
    }

    pub fn end_of_input(rows_read: u64) -> Self {
        Self {
            origin: TaskOrigin::Reader,
            row: rows_read,
            event: ControlEvent::EndOfInput { rows_read },
        }
    }

    pub fn end_of_sending() -> Self {
        Self {
            origin: TaskOrigin::Sender,
            row: 0,
            event: ControlEvent::EndOfSending,
        }
    }
}
