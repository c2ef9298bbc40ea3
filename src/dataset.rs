//! Core data model: cleaned trip records, the zone lookup, and the
//! read-only [`Dataset`] handle the pipeline and API run against.

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Borough name used for zone ids missing from the lookup.
pub const UNKNOWN_BOROUGH: &str = "Unknown";

/// Serde helper for the `YYYY-MM-DD HH:MM:SS` timestamps written by the
/// cleaning step (no `T` separator, optional fractional seconds on read).
pub mod pickup_ts {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    const WRITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
    const READ_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.format(WRITE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, READ_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// A single cleaned taxi trip. Immutable once loaded; the source of truth
/// for every aggregate in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    #[serde(with = "pickup_ts")]
    pub pickup_datetime: NaiveDateTime,
    pub pickup_location_id: u32,
    pub dropoff_location_id: u32,
    pub fare_amount: f64,
    pub trip_distance: f64,
    pub trip_duration_mins: f64,
}

impl Trip {
    pub fn hour_of_day(&self) -> u8 {
        self.pickup_datetime.hour() as u8
    }

    /// Weekday name, e.g. "Monday".
    pub fn day_of_week(&self) -> String {
        self.pickup_datetime.weekday().to_string_long()
    }

    pub fn is_weekend(&self) -> bool {
        matches!(
            self.pickup_datetime.weekday(),
            chrono::Weekday::Sat | chrono::Weekday::Sun
        )
    }

    /// Buckets the pickup hour into a named period of the day.
    pub fn time_of_day(&self) -> &'static str {
        match self.hour_of_day() {
            5..=8 => "Morning Rush",
            9..=11 => "Mid Morning",
            12..=16 => "Afternoon",
            17..=19 => "Evening Rush",
            20..=23 => "Night",
            _ => "Late Night",
        }
    }

    /// Average speed in mph, `None` when the trip has zero duration.
    pub fn avg_speed_mph(&self) -> Option<f64> {
        if self.trip_duration_mins <= 0.0 {
            return None;
        }
        Some(self.trip_distance / (self.trip_duration_mins / 60.0))
    }
}

trait WeekdayExt {
    fn to_string_long(&self) -> String;
}

impl WeekdayExt for chrono::Weekday {
    fn to_string_long(&self) -> String {
        use chrono::Weekday::*;
        match self {
            Mon => "Monday",
            Tue => "Tuesday",
            Wed => "Wednesday",
            Thu => "Thursday",
            Fri => "Friday",
            Sat => "Saturday",
            Sun => "Sunday",
        }
        .to_string()
    }
}

/// One row of the taxi zone lookup table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub location_id: u32,
    pub borough: String,
    pub zone: String,
    pub service_zone: Option<String>,
}

/// An immutable snapshot of the cleaned data: all trips plus the zone
/// lookup. Handed to the pipeline and the API by reference; replacing the
/// snapshot goes through [`Dataset::reload`] rather than mutation in place.
#[derive(Debug, Default)]
pub struct Dataset {
    trips: Vec<Trip>,
    zones: Vec<Zone>,
    by_id: HashMap<u32, usize>,
}

impl Dataset {
    pub fn new(trips: Vec<Trip>, zones: Vec<Zone>) -> Self {
        let by_id = zones
            .iter()
            .enumerate()
            .map(|(i, z)| (z.location_id, i))
            .collect();
        Dataset {
            trips,
            zones,
            by_id,
        }
    }

    /// Builds a dataset straight from the cleaned CSV files.
    pub fn from_csv(trips_path: &str, zones_path: &str) -> anyhow::Result<Self> {
        let trips = crate::parser::read_trips(trips_path)?;
        let zones = crate::parser::read_zones(zones_path)?;
        Ok(Dataset::new(trips, zones))
    }

    /// Replaces the loaded snapshot wholesale.
    pub fn reload(&mut self, trips: Vec<Trip>, zones: Vec<Zone>) {
        *self = Dataset::new(trips, zones);
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Borough for a zone id. Ids missing from the lookup report
    /// [`UNKNOWN_BOROUGH`] so their trips are never dropped silently.
    pub fn borough(&self, zone_id: u32) -> &str {
        self.by_id
            .get(&zone_id)
            .map(|&i| self.zones[i].borough.as_str())
            .unwrap_or(UNKNOWN_BOROUGH)
    }

    /// Zone name for a zone id, if known.
    pub fn zone_name(&self, zone_id: u32) -> Option<&str> {
        self.by_id.get(&zone_id).map(|&i| self.zones[i].zone.as_str())
    }
}
