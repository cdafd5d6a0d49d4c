//! The pipeline coordinator.
//!
//! Drives one reader task and a fixed-size pool of sender tasks to
//! completion. The reader converts rows and pushes them through the
//! bounded [`DataRouter`]; senders dispatch to the shared sink; both
//! report status over the unbounded control channel. The coordinator is
//! the only mutator of run state and the run completes only after the
//! reader's terminal message and exactly one `EndOfSending` sentinel per
//! sender have been observed.

use crate::config::PipelineConfig;
use crate::router::DataRouter;
use crate::stats::{PipelineStats, StatsSnapshot};
use anyhow::anyhow;
use futures::future;
use rp_csvjson::JsonRecords;
use rp_error::{PushError, ReadError, Severity, classify_read_error};
use rp_traits::Sink;
use rp_types::{ControlEvent, ControlMessage, DataMessage, TaskOrigin};
use std::io::Read;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Data rows the reader attempted, including skipped rows
    pub total_rows: u64,

    /// Final counters
    pub stats: StatsSnapshot,
}

/// One configured ingestion-and-dispatch run.
pub struct Pipeline<R: Read + Send + 'static> {
    records: JsonRecords<R>,
    sink: Arc<dyn Sink>,
    config: PipelineConfig,
    stats: Arc<PipelineStats>,
}

impl<R: Read + Send + 'static> Pipeline<R> {
    /// Creates a pipeline over a row transformer and a sink.
    pub fn new(records: JsonRecords<R>, sink: Arc<dyn Sink>, config: PipelineConfig) -> Self {
        Self {
            records,
            sink,
            config,
            stats: Arc::new(PipelineStats::new()),
        }
    }

    /// Handle to the run statistics, for progress reporting.
    pub fn stats(&self) -> Arc<PipelineStats> {
        Arc::clone(&self.stats)
    }

    /// Runs the pipeline to completion.
    ///
    /// On a fatal error the run aborts cooperatively: the reader and the
    /// remaining senders are signalled, undispatched rows are dropped,
    /// every task is joined, and [`PushError::Aborted`] is returned with
    /// the row the failing task was handling.
    pub async fn run(self) -> Result<RunSummary, PushError> {
        let Self {
            records,
            sink,
            config,
            stats,
        } = self;
        let concurrency = config.concurrency.max(1);

        info!(
            concurrency,
            buffer_size = config.buffer_size,
            row_limit = config.row_limit,
            "starting pipeline"
        );

        let (ctl_tx, mut ctl_rx) = mpsc::unbounded_channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let (router, receivers) = DataRouter::new(concurrency, config.buffer_size);
        let router = Arc::new(router);

        let mut sender_handles: Vec<JoinHandle<()>> = Vec::with_capacity(concurrency);
        for (id, rx) in receivers.into_iter().enumerate() {
            let sink = Arc::clone(&sink);
            let ctl = ctl_tx.clone();
            let cancel = Arc::clone(&cancel);
            sender_handles.push(tokio::spawn(sender_loop(id, rx, sink, ctl, cancel)));
        }

        let reader_handle = {
            let router = Arc::clone(&router);
            let ctl = ctl_tx.clone();
            let cancel = Arc::clone(&cancel);
            let row_limit = config.row_limit;
            tokio::task::spawn_blocking(move || reader_loop(records, router, ctl, cancel, row_limit))
        };
        // The coordinator holds no control sender; the channel ends when
        // every task has finished.
        drop(ctl_tx);

        let mut sentinels = 0usize;
        let mut total_rows: Option<u64> = None;
        let mut fatal: Option<(u64, PushError)> = None;

        while sentinels < concurrency {
            let Some(message) = ctl_rx.recv().await else {
                break;
            };
            match message.event {
                ControlEvent::RowRead => {
                    stats.record_row_read();
                    trace!(row = message.row, "row queued");
                }
                ControlEvent::RowSkipped(cause) => {
                    stats.record_row_skipped();
                    warn!(row = message.row, %cause, "skipped malformed row");
                }
                ControlEvent::DocumentSent { bytes } => {
                    stats.record_document_sent(bytes);
                    trace!(row = message.row, bytes, "document sent");
                }
                ControlEvent::EndOfInput { rows_read } => {
                    if total_rows.is_none() {
                        total_rows = Some(rows_read);
                    }
                    debug!(rows = rows_read, "input exhausted, closing data channel");
                    router.close();
                }
                ControlEvent::Fatal(cause) => {
                    if fatal.is_none() {
                        error!(
                            origin = %message.origin,
                            row = message.row,
                            %cause,
                            "fatal error, aborting run"
                        );
                        cancel.store(true, Ordering::Relaxed);
                        router.close();
                        fatal = Some((message.row, cause));
                    } else {
                        warn!(
                            origin = %message.origin,
                            row = message.row,
                            %cause,
                            "further error while aborting"
                        );
                    }
                }
                ControlEvent::EndOfSending => {
                    sentinels += 1;
                    debug!(finished = sentinels, of = concurrency, "sender finished");
                }
            }
        }

        if let Err(join_error) = reader_handle.await {
            error!(error = %join_error, "reader task panicked");
        }
        match tokio::time::timeout(config.shutdown_timeout, future::join_all(sender_handles)).await
        {
            Ok(results) => {
                for (id, result) in results.into_iter().enumerate() {
                    if let Err(join_error) = result {
                        error!(sender = id, error = %join_error, "sender task panicked");
                    }
                }
            }
            Err(_) => warn!("shutdown timeout exceeded, some senders may not have finished"),
        }

        stats.complete();

        if let Some((row, source)) = fatal {
            return Err(PushError::Aborted {
                row,
                source: Box::new(source),
            });
        }
        if sentinels < concurrency {
            return Err(PushError::Other(anyhow!(
                "control channel closed with {sentinels} of {concurrency} senders finished"
            )));
        }

        let summary = RunSummary {
            total_rows: total_rows.unwrap_or(0),
            stats: stats.snapshot(),
        };
        info!(
            total_rows = summary.total_rows,
            documents_sent = summary.stats.documents_sent,
            rows_skipped = summary.stats.rows_skipped,
            "pipeline completed"
        );
        Ok(summary)
    }
}

/// Reader task: converts rows and fans them out until the input, the row
/// limit, or a cancellation ends it.
///
/// Runs on the blocking pool; the underlying CSV source does synchronous
/// I/O.
fn reader_loop<R: Read>(
    mut records: JsonRecords<R>,
    router: Arc<DataRouter>,
    ctl: mpsc::UnboundedSender<ControlMessage>,
    cancel: Arc<AtomicBool>,
    row_limit: Option<u64>,
) {
    let mut row: u64 = 0;
    loop {
        if cancel.load(Ordering::Relaxed) {
            debug!(row, "reader cancelled");
            return;
        }
        if row_limit.is_some_and(|limit| row >= limit) {
            debug!(row, "row limit reached");
            break;
        }
        match records.read() {
            Ok(Some(payload)) => {
                if router.route_blocking(DataMessage { payload, row }).is_err() {
                    debug!(row, "data channel closed, reader stopping");
                    return;
                }
                let _ = ctl.send(ControlMessage::row_read(row));
            }
            Ok(None) => break,
            Err(cause) => match classify_read_error(&cause) {
                Severity::RowLocal => {
                    // The only row-local read error carries a RowError.
                    if let ReadError::Row(row_error) = cause {
                        let _ = ctl.send(ControlMessage::row_skipped(row, row_error));
                    }
                }
                Severity::Fatal => {
                    let _ = ctl.send(ControlMessage::fatal(TaskOrigin::Reader, row, cause.into()));
                    return;
                }
            },
        }
        row += 1;
    }
    let _ = ctl.send(ControlMessage::end_of_input(row));
}

/// Sender task: dispatches queued documents to the sink until the data
/// channel is closed and drained, then emits its sentinel.
///
/// Sink failures are fatal by policy; there is no retry contract. While
/// the run is aborting, remaining rows are drained and dropped so the
/// reader can never deadlock on a full buffer.
async fn sender_loop(
    id: usize,
    mut rx: mpsc::Receiver<DataMessage>,
    sink: Arc<dyn Sink>,
    ctl: mpsc::UnboundedSender<ControlMessage>,
    cancel: Arc<AtomicBool>,
) {
    debug!(sender = id, "sender started");
    while let Some(message) = rx.recv().await {
        if cancel.load(Ordering::Relaxed) {
            trace!(sender = id, row = message.row, "dropping row while aborting");
            continue;
        }
        let bytes = message.payload.len() as u64;
        match sink.send(&message.payload).await {
            Ok(()) => {
                let _ = ctl.send(ControlMessage::document_sent(message.row, bytes));
            }
            Err(cause) => {
                let _ = ctl.send(ControlMessage::fatal(
                    TaskOrigin::Sender,
                    message.row,
                    cause.into(),
                ));
            }
        }
    }
    let _ = ctl.send(ControlMessage::end_of_sending());
    debug!(sender = id, "sender finished");
}
