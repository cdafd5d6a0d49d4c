//! Point store trait and read-back stream.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::Stream;
use rp_error::StoreError;
use rp_types::{Measurement, Point, TimedValue};
use std::pin::Pin;

/// Lazily-iterated range read-back. The end of the stream is the
/// end-of-records signal.
pub type TimedValueStream = Pin<Box<dyn Stream<Item = Result<TimedValue, StoreError>> + Send>>;

/// Storage backend for measurement points.
///
/// Concrete time-series databases live behind this seam; the repo ships
/// an in-memory implementation for tests and local runs.
#[async_trait]
pub trait PointStore: Send + Sync {
    /// Writes a batch of points.
    async fn write_points(&self, points: &[Point]) -> Result<(), StoreError>;

    /// Reads the values of one measurement for one station within
    /// `[start, stop)`, ordered by time.
    async fn read_range(
        &self,
        measurement: Measurement,
        station: &str,
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
    ) -> Result<TimedValueStream, StoreError>;
}
