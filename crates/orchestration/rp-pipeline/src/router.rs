//! Data router for fanning rows out to the sender pool.

use parking_lot::Mutex;
use rp_types::DataMessage;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Routes data messages to a pool of sender tasks.
///
/// Each sender owns one bounded channel; messages are distributed
/// round-robin. A full channel blocks the reader, which is the
/// pipeline's backpressure mechanism. Closing the router drops every
/// channel sender, so each pool member drains its remaining messages
/// and then observes end-of-channel.
pub struct DataRouter {
    /// One channel sender per pool member; emptied on close
    senders: Mutex<Vec<mpsc::Sender<DataMessage>>>,

    /// Round-robin counter
    next: AtomicUsize,
}

impl DataRouter {
    /// Creates a router with `pool_size` channels of `buffer_size`
    /// capacity each. Returns the router and one receiver per sender
    /// task.
    pub fn new(pool_size: usize, buffer_size: usize) -> (Self, Vec<mpsc::Receiver<DataMessage>>) {
        let pool_size = pool_size.max(1);
        let buffer_size = buffer_size.max(1);

        let mut senders = Vec::with_capacity(pool_size);
        let mut receivers = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            let (tx, rx) = mpsc::channel(buffer_size);
            senders.push(tx);
            receivers.push(rx);
        }

        let router = Self {
            senders: Mutex::new(senders),
            next: AtomicUsize::new(0),
        };
        (router, receivers)
    }

    /// Routes one message from a blocking (non-async) context, waiting
    /// while the chosen channel is full.
    ///
    /// Returns the message back if the router was closed.
    pub fn route_blocking(&self, message: DataMessage) -> Result<(), DataMessage> {
        // Clone the sender out so the lock is not held across the
        // (possibly long) blocking send.
        let sender = {
            let senders = self.senders.lock();
            if senders.is_empty() {
                return Err(message);
            }
            let index = self.next.fetch_add(1, Ordering::Relaxed) % senders.len();
            trace!(sender = index, row = message.row, "routing row");
            senders[index].clone()
        };

        sender.blocking_send(message).map_err(|error| error.0)
    }

    /// Closes the data channels. Messages already buffered remain
    /// receivable; no further pushes are possible.
    pub fn close(&self) {
        let dropped = std::mem::take(&mut *self.senders.lock());
        debug!(channels = dropped.len(), "data router closed");
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.senders.lock().is_empty()
    }
}
