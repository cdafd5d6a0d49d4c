//! Sink trait.

use async_trait::async_trait;
use rp_error::SinkError;

/// Destination for serialized documents.
///
/// The sink is selected once at startup and shared by every sender task
/// as an `Arc<dyn Sink>`; implementations must tolerate concurrent
/// calls.
///
/// # Implementations
///
/// - Stdout sink: newline-delimited payloads on stdout
/// - HTTP sink: POST of the payload, non-2xx mapped to [`SinkError`]
/// - Stats sink: counts documents without output
/// - Sensor sink: decodes a sensor reading and writes measurement points
#[async_trait]
pub trait Sink: Send + Sync {
    /// Delivers one serialized document.
    async fn send(&self, payload: &[u8]) -> Result<(), SinkError>;
}
