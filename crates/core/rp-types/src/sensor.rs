//! Sensor reading model.
//!
//! [`RawReading`] mirrors the upstream station export: every field is a
//! raw string, missing columns deserialize to empty strings. The
//! sensor-store sink maps readings into per-measurement [`Point`]s.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// One raw record from a sensor station, all fields string-typed.
///
/// Field names follow the station export columns; no numeric coercion
/// happens here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawReading {
    /// Measurement date/time, local to the station (UTC+1)
    pub time: String,

    /// Station code
    pub station: String,

    /// Land use code (me = meadows, pa = pasture, bs = bare soil, fo = forest)
    pub landuse: String,

    /// Station altitude in meters
    pub altitude: String,

    /// Latitude in decimal degrees
    pub latitude: String,

    /// Longitude in decimal degrees
    pub longitude: String,

    /// Relative humidity in percent (15 min average)
    #[serde(rename = "air_rh_avg")]
    pub air_rel_humidity_avg: String,

    /// Air temperature in Celsius (15 min average)
    #[serde(rename = "air_t_avg")]
    pub air_temp_avg: String,

    /// Upward shortwave radiation; undocumented upstream
    pub nr_up_sw_avg: String,

    /// Precipitation in mm (15 min cumulative sum)
    #[serde(rename = "precip_rt_nrt_tot")]
    pub precip_tot: String,

    /// Snow height in meters
    pub snow_height: String,

    /// Global solar radiation in W/m2 (15 min average)
    pub sr_avg: String,

    /// Wind direction in degrees (15 min average)
    pub wind_dir: String,

    /// Wind speed in m/s; some stations report here instead of
    /// `wind_speed_avg`
    pub wind_speed: String,

    /// Wind speed in m/s (15 min average)
    pub wind_speed_avg: String,

    /// Wind gust in m/s
    pub wind_speed_max: String,
}

/// The measurements a reading can contribute points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measurement {
    Temperature,
    WindSpeed,
    WindGust,
    Humidity,
    Precipitation,
    Snow,
}

impl Measurement {
    /// Measurement name as stored.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::WindSpeed => "wind_speed",
            Self::WindGust => "wind_gust",
            Self::Humidity => "humidity",
            Self::Precipitation => "precipitation",
            Self::Snow => "snow",
        }
    }

    /// Measurement unit.
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Temperature => "celsius",
            Self::WindSpeed | Self::WindGust => "m/s",
            Self::Humidity => "percent",
            Self::Precipitation => "mm",
            Self::Snow => "m",
        }
    }
}

impl std::fmt::Display for Measurement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One measurement point, tagged with the station position and unit.
///
/// Tags stay raw strings, exactly as read from the record.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub measurement: Measurement,

    /// Field key within the measurement ("avg15" for averaged values,
    /// "max" for gusts, "height" for snow)
    pub field: &'static str,

    /// Unit tag, from [`Measurement::unit`]
    pub unit: &'static str,

    pub value: f64,

    /// Event time parsed from the reading's local timestamp
    pub time: DateTime<FixedOffset>,

    pub station: String,
    pub altitude: String,
    pub latitude: String,
    pub longitude: String,
}

/// One value from a range read-back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedValue {
    pub time: DateTime<Utc>,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_deserializes_from_renamed_columns() {
        let json = r#"{"time":"2020-03-01 14:00:00","station":"b1","air_t_avg":"4.2","air_rh_avg":"81","sr_avg":"732","wind_dir":"212"}"#;
        let reading: RawReading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.station, "b1");
        assert_eq!(reading.air_temp_avg, "4.2");
        assert_eq!(reading.air_rel_humidity_avg, "81");
        assert_eq!(reading.sr_avg, "732");
        assert_eq!(reading.wind_dir, "212");
        // Missing columns default to empty strings.
        assert_eq!(reading.snow_height, "");
        assert_eq!(reading.nr_up_sw_avg, "");
    }

    #[test]
    fn measurement_names_and_units() {
        assert_eq!(Measurement::Temperature.name(), "temperature");
        assert_eq!(Measurement::Temperature.unit(), "celsius");
        assert_eq!(Measurement::WindGust.unit(), "m/s");
        assert_eq!(Measurement::Precipitation.to_string(), "precipitation");
    }
}
