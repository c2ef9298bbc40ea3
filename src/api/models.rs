//! Wire types for the JSON API.

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Trip};

/// Standard response envelope: `{"success": true, "data": ...}` on the
/// happy path, `{"success": false, "error": ...}` otherwise.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Root endpoint payload listing the available routes.
#[derive(Debug, Serialize)]
pub struct IndexInfo {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<&'static str>,
}

/// Optional filters for `/api/trips`.
#[derive(Debug, Default, Deserialize)]
pub struct TripFilters {
    pub borough: Option<String>,
    pub time_of_day: Option<String>,
    pub day: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BoroughQuery {
    pub borough: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

/// One trip row as served by `/api/trips`, with lookup names and derived
/// fields resolved.
#[derive(Debug, Serialize)]
pub struct TripRow {
    #[serde(with = "crate::dataset::pickup_ts")]
    pub pickup_datetime: chrono::NaiveDateTime,
    pub pickup_borough: String,
    pub pickup_zone: String,
    pub dropoff_borough: String,
    pub dropoff_zone: String,
    pub fare_amount: f64,
    pub trip_distance: f64,
    pub trip_duration_mins: f64,
    pub avg_speed_mph: Option<f64>,
    pub hour_of_day: u8,
    pub time_of_day: &'static str,
    pub day_of_week: String,
}

impl TripRow {
    pub fn from_trip(trip: &Trip, dataset: &Dataset) -> Self {
        TripRow {
            pickup_datetime: trip.pickup_datetime,
            pickup_borough: dataset.borough(trip.pickup_location_id).to_string(),
            pickup_zone: dataset
                .zone_name(trip.pickup_location_id)
                .unwrap_or("Unknown")
                .to_string(),
            dropoff_borough: dataset.borough(trip.dropoff_location_id).to_string(),
            dropoff_zone: dataset
                .zone_name(trip.dropoff_location_id)
                .unwrap_or("Unknown")
                .to_string(),
            fare_amount: trip.fare_amount,
            trip_distance: trip.trip_distance,
            trip_duration_mins: trip.trip_duration_mins,
            avg_speed_mph: trip.avg_speed_mph(),
            hour_of_day: trip.hour_of_day(),
            time_of_day: trip.time_of_day(),
            day_of_week: trip.day_of_week(),
        }
    }
}

/// Paged trip listing for `/api/trips`.
#[derive(Debug, Serialize)]
pub struct TripsPage {
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub data: Vec<TripRow>,
}
