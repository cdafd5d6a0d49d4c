//! In-memory point store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream;
use parking_lot::Mutex;
use rp_error::StoreError;
use rp_traits::{PointStore, TimedValueStream};
use rp_types::{Measurement, Point, TimedValue};

/// Point store backed by a vector.
///
/// Stands in for a time-series database in tests and local runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    points: Mutex<Vec<Point>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored points.
    pub fn len(&self) -> usize {
        self.points.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.lock().is_empty()
    }

    /// Copy of all stored points.
    pub fn points(&self) -> Vec<Point> {
        self.points.lock().clone()
    }
}

#[async_trait]
impl PointStore for MemoryStore {
    async fn write_points(&self, points: &[Point]) -> Result<(), StoreError> {
        self.points.lock().extend_from_slice(points);
        Ok(())
    }

    async fn read_range(
        &self,
        measurement: Measurement,
        station: &str,
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
    ) -> Result<TimedValueStream, StoreError> {
        let mut matches: Vec<TimedValue> = self
            .points
            .lock()
            .iter()
            .filter(|point| point.measurement == measurement && point.station == station)
            .filter(|point| {
                let time = point.time.with_timezone(&Utc);
                start <= time && time < stop
            })
            .map(|point| TimedValue {
                time: point.time.with_timezone(&Utc),
                value: point.value,
            })
            .collect();
        matches.sort_by_key(|value| value.time);

        Ok(Box::pin(stream::iter(matches.into_iter().map(Ok))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use futures::TryStreamExt;

    fn point(station: &str, hour: u32, value: f64) -> Point {
        Point {
            measurement: Measurement::Temperature,
            field: "avg15",
            unit: Measurement::Temperature.unit(),
            value,
            time: chrono::FixedOffset::east_opt(3600)
                .unwrap()
                .with_ymd_and_hms(2020, 3, 1, hour, 0, 0)
                .unwrap(),
            station: station.to_string(),
            altitude: "990".to_string(),
            latitude: "46.68".to_string(),
            longitude: "10.58".to_string(),
        }
    }

    #[tokio::test]
    async fn read_range_filters_by_station_and_window() {
        let store = MemoryStore::new();
        store
            .write_points(&[
                point("b1", 10, 1.0),
                point("b1", 12, 2.0),
                point("b1", 14, 3.0),
                point("b2", 12, 9.0),
            ])
            .await
            .unwrap();

        let start = Utc.with_ymd_and_hms(2020, 3, 1, 8, 30, 0).unwrap();
        let stop = Utc.with_ymd_and_hms(2020, 3, 1, 12, 30, 0).unwrap();

        let values: Vec<TimedValue> = store
            .read_range(Measurement::Temperature, "b1", start, stop)
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        // Local 10:00 and 12:00 (+01:00) are 09:00 and 11:00 UTC.
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].value, 1.0);
        assert_eq!(values[1].value, 2.0);
        assert!(values[0].time < values[1].time);
    }

    #[tokio::test]
    async fn read_back_series_can_be_despiked() {
        let store = MemoryStore::new();
        let values = [1.0, 1.0, 1.0, 10.0, 1.0, 1.0, 1.0];
        let points: Vec<Point> = values
            .iter()
            .enumerate()
            .map(|(i, value)| point("b1", 8 + i as u32, *value))
            .collect();
        store.write_points(&points).await.unwrap();

        let start = Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap();
        let stop = Utc.with_ymd_and_hms(2020, 3, 2, 0, 0, 0).unwrap();
        let series: Vec<f64> = store
            .read_range(Measurement::Temperature, "b1", start, stop)
            .await
            .unwrap()
            .try_collect::<Vec<TimedValue>>()
            .await
            .unwrap()
            .iter()
            .map(|value| value.value)
            .collect();

        let (filtered, outliers) = rp_stats::hampel(&series, 2, 3.0).unwrap();
        assert_eq!(outliers, vec![3]);
        assert_eq!(filtered, vec![1.0; 7]);
    }

    #[tokio::test]
    async fn read_range_yields_empty_stream_when_nothing_matches() {
        let store = MemoryStore::new();
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let stop = Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap();

        let values: Vec<TimedValue> = store
            .read_range(Measurement::Snow, "b1", start, stop)
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        assert!(values.is_empty());
    }
}
