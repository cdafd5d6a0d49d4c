//! Sensor-store sink.
//!
//! Decodes each document back into a [`RawReading`] and writes one
//! point per parseable measurement to a [`PointStore`]. Station
//! timestamps are local time at a fixed +01:00 offset.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use rp_error::{SinkError, StoreError};
use rp_traits::{PointStore, Sink};
use rp_types::{Measurement, Point, RawReading};
use std::sync::Arc;
use tracing::trace;

/// Timestamp layout of the station export, without the offset.
const TIME_LAYOUT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Fixed local offset of the station network (UTC+1).
const TIME_OFFSET: &str = "+0100";

/// Sink that persists sensor readings as measurement points.
pub struct SensorSink {
    store: Arc<dyn PointStore>,
}

impl SensorSink {
    pub fn new(store: Arc<dyn PointStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Sink for SensorSink {
    async fn send(&self, payload: &[u8]) -> Result<(), SinkError> {
        let reading: RawReading = serde_json::from_slice(payload)
            .map_err(|error| SinkError::Payload(error.to_string()))?;

        let points = points_from_reading(&reading)?;
        trace!(
            station = %reading.station,
            points = points.len(),
            "writing reading"
        );
        self.store.write_points(&points).await?;
        Ok(())
    }
}

/// Parses the reading's event time.
pub fn event_time(reading: &RawReading) -> Result<DateTime<FixedOffset>, StoreError> {
    DateTime::parse_from_str(&format!("{} {TIME_OFFSET}", reading.time), TIME_LAYOUT).map_err(
        |error| StoreError::Timestamp {
            value: reading.time.clone(),
            reason: error.to_string(),
        },
    )
}

/// Maps a raw reading into per-measurement points.
///
/// Values that fail to parse or parse to NaN skip only their own
/// measurement; an unparseable event time fails the whole reading. Wind
/// speed prefers the 15-minute average and falls back to the
/// instantaneous column, since stations disagree about which one they
/// fill.
pub fn points_from_reading(reading: &RawReading) -> Result<Vec<Point>, StoreError> {
    let time = event_time(reading)?;

    let point = |measurement: Measurement, field: &'static str, value: f64| Point {
        measurement,
        field,
        unit: measurement.unit(),
        value,
        time,
        station: reading.station.clone(),
        altitude: reading.altitude.clone(),
        latitude: reading.latitude.clone(),
        longitude: reading.longitude.clone(),
    };

    let mut points = Vec::with_capacity(6);

    if let Some(value) = parse_value(&reading.air_temp_avg) {
        points.push(point(Measurement::Temperature, "avg15", value));
    }
    if let Some(value) =
        parse_value(&reading.wind_speed_avg).or_else(|| parse_value(&reading.wind_speed))
    {
        points.push(point(Measurement::WindSpeed, "avg15", value));
    }
    if let Some(value) = parse_value(&reading.wind_speed_max) {
        points.push(point(Measurement::WindGust, "max", value));
    }
    if let Some(value) = parse_value(&reading.air_rel_humidity_avg) {
        points.push(point(Measurement::Humidity, "avg15", value));
    }
    if let Some(value) = parse_value(&reading.precip_tot) {
        points.push(point(Measurement::Precipitation, "avg15", value));
    }
    if let Some(value) = parse_value(&reading.snow_height) {
        points.push(point(Measurement::Snow, "height", value));
    }

    Ok(points)
}

fn parse_value(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| !value.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn reading() -> RawReading {
        RawReading {
            time: "2020-03-01 14:00:00".to_string(),
            station: "b1".to_string(),
            altitude: "990".to_string(),
            latitude: "46.68".to_string(),
            longitude: "10.58".to_string(),
            air_temp_avg: "4.2".to_string(),
            air_rel_humidity_avg: "81".to_string(),
            wind_speed_avg: "1.6".to_string(),
            wind_speed_max: "3.1".to_string(),
            precip_tot: "0".to_string(),
            snow_height: "0.25".to_string(),
            ..RawReading::default()
        }
    }

    #[test]
    fn maps_every_parseable_measurement() {
        let points = points_from_reading(&reading()).unwrap();
        assert_eq!(points.len(), 6);

        let temperature = points
            .iter()
            .find(|p| p.measurement == Measurement::Temperature)
            .unwrap();
        assert_eq!(temperature.value, 4.2);
        assert_eq!(temperature.field, "avg15");
        assert_eq!(temperature.unit, "celsius");
        assert_eq!(temperature.station, "b1");
        assert_eq!(temperature.altitude, "990");

        let gust = points
            .iter()
            .find(|p| p.measurement == Measurement::WindGust)
            .unwrap();
        assert_eq!(gust.field, "max");
        assert_eq!(gust.unit, "m/s");
    }

    #[test]
    fn snow_is_stored_as_a_height_field() {
        let points = points_from_reading(&reading()).unwrap();
        let snow = points
            .iter()
            .find(|p| p.measurement == Measurement::Snow)
            .unwrap();
        assert_eq!(snow.field, "height");
        assert_eq!(snow.unit, "m");
        assert_eq!(snow.value, 0.25);
    }

    #[test]
    fn event_time_is_parsed_at_the_fixed_offset() {
        let points = points_from_reading(&reading()).unwrap();
        assert_eq!(
            points[0].time.to_rfc3339(),
            "2020-03-01T14:00:00+01:00"
        );
    }

    #[test]
    fn unparseable_values_skip_only_their_measurement() {
        let mut r = reading();
        r.air_temp_avg = "NaN".to_string();
        r.snow_height = String::new();

        let points = points_from_reading(&r).unwrap();
        assert!(points
            .iter()
            .all(|p| p.measurement != Measurement::Temperature));
        assert!(points.iter().all(|p| p.measurement != Measurement::Snow));
        assert_eq!(points.len(), 4);
    }

    #[test]
    fn wind_speed_falls_back_to_instant_column() {
        let mut r = reading();
        r.wind_speed_avg = String::new();
        r.wind_speed = "2.4".to_string();

        let points = points_from_reading(&r).unwrap();
        let wind = points
            .iter()
            .find(|p| p.measurement == Measurement::WindSpeed)
            .unwrap();
        assert_eq!(wind.value, 2.4);
    }

    #[test]
    fn bad_timestamp_fails_the_reading() {
        let mut r = reading();
        r.time = "not a time".to_string();

        assert!(matches!(
            points_from_reading(&r),
            Err(StoreError::Timestamp { .. })
        ));
    }

    #[tokio::test]
    async fn sink_writes_points_to_the_store() {
        let store = Arc::new(MemoryStore::new());
        let sink = SensorSink::new(store.clone());

        let payload = serde_json::to_vec(&reading()).unwrap();
        sink.send(&payload).await.unwrap();

        assert_eq!(store.len(), 6);
    }

    #[tokio::test]
    async fn sink_rejects_non_reading_payloads() {
        let store = Arc::new(MemoryStore::new());
        let sink = SensorSink::new(store);

        let result = sink.send(b"not json").await;
        assert!(matches!(result, Err(SinkError::Payload(_))));
    }
}
