//! Dataset-wide summary statistics and the grouped aggregates behind the
//! dashboard endpoints.

use serde::Serialize;
use std::collections::HashMap;

use crate::dataset::Dataset;
use crate::ranking::utility::round2;

/// Scalar statistics over the whole cleaned trip set.
#[derive(Debug, Default, Serialize)]
pub struct SummaryStats {
    pub total_trips: u64,
    pub avg_fare: f64,
    pub avg_distance: f64,
    pub avg_duration_mins: f64,
    /// Average per-trip speed; 0.0 when no trip has a positive duration.
    pub avg_speed_mph: f64,
    /// Busiest pickup borough, `None` for an empty dataset.
    pub top_borough: Option<String>,
    /// Busiest pickup hour (0-23), `None` for an empty dataset.
    pub peak_hour: Option<u8>,
}

impl SummaryStats {
    /// Single pass over the trips. Zero-duration trips are skipped for the
    /// speed average; ties for top borough and peak hour go to the first
    /// one encountered in trip order.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut s = SummaryStats::default();

        let mut fare_sum = 0.0;
        let mut distance_sum = 0.0;
        let mut duration_sum = 0.0;
        let mut speed_sum = 0.0;
        let mut speed_count = 0u64;

        let mut borough_counts = FirstSeenCounter::new();
        let mut hour_counts = FirstSeenCounter::new();

        for trip in dataset.trips() {
            s.total_trips += 1;
            fare_sum += trip.fare_amount;
            distance_sum += trip.trip_distance;
            duration_sum += trip.trip_duration_mins;

            if let Some(speed) = trip.avg_speed_mph() {
                speed_sum += speed;
                speed_count += 1;
            }

            borough_counts.bump(dataset.borough(trip.pickup_location_id).to_string());
            hour_counts.bump(trip.hour_of_day());
        }

        if s.total_trips > 0 {
            let n = s.total_trips as f64;
            s.avg_fare = round2(fare_sum / n);
            s.avg_distance = round2(distance_sum / n);
            s.avg_duration_mins = round2(duration_sum / n);
        }
        if speed_count > 0 {
            s.avg_speed_mph = round2(speed_sum / speed_count as f64);
        }

        s.top_borough = borough_counts.top();
        s.peak_hour = hour_counts.top();

        s
    }
}

/// Counts keys while remembering first-seen order, so the maximum is
/// deterministic under ties (first to reach the winning count wins).
struct FirstSeenCounter<K> {
    order: Vec<K>,
    counts: HashMap<K, u64>,
}

impl<K: std::hash::Hash + Eq + Clone> FirstSeenCounter<K> {
    fn new() -> Self {
        FirstSeenCounter {
            order: Vec::new(),
            counts: HashMap::new(),
        }
    }

    fn bump(&mut self, key: K) {
        let entry = self.counts.entry(key.clone()).or_insert(0);
        if *entry == 0 {
            self.order.push(key);
        }
        *entry += 1;
    }

    fn top(&self) -> Option<K> {
        let mut best: Option<(&K, u64)> = None;
        for key in &self.order {
            let count = self.counts[key];
            // Strict > keeps the earliest key on ties
            if best.map(|(_, c)| count > c).unwrap_or(true) {
                best = Some((key, count));
            }
        }
        best.map(|(k, _)| k.clone())
    }
}

/// Per-borough aggregate for `/api/trips/by-borough`.
#[derive(Debug, Serialize)]
pub struct BoroughStats {
    pub borough: String,
    pub total_trips: u64,
    pub avg_fare: f64,
    pub avg_distance: f64,
    pub avg_duration_mins: f64,
}

/// Per-hour aggregate for `/api/trips/by-hour`.
#[derive(Debug, Serialize)]
pub struct HourStats {
    pub hour_of_day: u8,
    pub total_trips: u64,
    pub avg_fare: f64,
    pub avg_duration_mins: f64,
}

/// Per-weekday aggregate for `/api/trips/by-day`.
#[derive(Debug, Serialize)]
pub struct DayStats {
    pub day_of_week: String,
    pub total_trips: u64,
    pub avg_fare: f64,
    pub avg_distance: f64,
    pub is_weekend: bool,
}

/// Zone-pair aggregate for `/api/trips/top-routes`.
#[derive(Debug, Serialize)]
pub struct RouteStats {
    pub pickup_zone: String,
    pub dropoff_zone: String,
    pub pickup_borough: String,
    pub dropoff_borough: String,
    pub total_trips: u64,
    pub avg_fare: f64,
    pub avg_distance: f64,
}

struct GroupAcc {
    count: u64,
    fare_sum: f64,
    distance_sum: f64,
    duration_sum: f64,
}

impl GroupAcc {
    fn new() -> Self {
        GroupAcc {
            count: 0,
            fare_sum: 0.0,
            distance_sum: 0.0,
            duration_sum: 0.0,
        }
    }
}

fn group_trips<'a, K, F>(dataset: &'a Dataset, mut key: F) -> Vec<(K, GroupAcc)>
where
    K: std::hash::Hash + Eq + Clone,
    F: FnMut(&'a crate::dataset::Trip) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, GroupAcc)> = Vec::new();

    for trip in dataset.trips() {
        let k = key(trip);
        let slot = *index.entry(k.clone()).or_insert_with(|| {
            groups.push((k, GroupAcc::new()));
            groups.len() - 1
        });
        let acc = &mut groups[slot].1;
        acc.count += 1;
        acc.fare_sum += trip.fare_amount;
        acc.distance_sum += trip.trip_distance;
        acc.duration_sum += trip.trip_duration_mins;
    }

    groups
}

/// Pickup-borough aggregates, busiest first. The `Unknown` bucket is kept;
/// the API decides whether to show it.
pub fn trips_by_borough(dataset: &Dataset) -> Vec<BoroughStats> {
    let mut rows: Vec<BoroughStats> = group_trips(dataset, |t| {
        dataset.borough(t.pickup_location_id).to_string()
    })
    .into_iter()
    .map(|(borough, acc)| {
        let n = acc.count as f64;
        BoroughStats {
            borough,
            total_trips: acc.count,
            avg_fare: round2(acc.fare_sum / n),
            avg_distance: round2(acc.distance_sum / n),
            avg_duration_mins: round2(acc.duration_sum / n),
        }
    })
    .collect();

    rows.sort_by(|a, b| b.total_trips.cmp(&a.total_trips));
    rows
}

/// Per-hour aggregates, hour ascending, optionally restricted to one
/// pickup borough.
pub fn trips_by_hour(dataset: &Dataset, borough: Option<&str>) -> Vec<HourStats> {
    let mut index: HashMap<u8, usize> = HashMap::new();
    let mut groups: Vec<(u8, GroupAcc)> = Vec::new();

    for trip in dataset.trips() {
        if let Some(wanted) = borough {
            if dataset.borough(trip.pickup_location_id) != wanted {
                continue;
            }
        }
        let hour = trip.hour_of_day();
        let slot = *index.entry(hour).or_insert_with(|| {
            groups.push((hour, GroupAcc::new()));
            groups.len() - 1
        });
        let acc = &mut groups[slot].1;
        acc.count += 1;
        acc.fare_sum += trip.fare_amount;
        acc.duration_sum += trip.trip_duration_mins;
    }

    let mut rows: Vec<HourStats> = groups
        .into_iter()
        .map(|(hour, acc)| {
            let n = acc.count as f64;
            HourStats {
                hour_of_day: hour,
                total_trips: acc.count,
                avg_fare: round2(acc.fare_sum / n),
                avg_duration_mins: round2(acc.duration_sum / n),
            }
        })
        .collect();

    rows.sort_by_key(|r| r.hour_of_day);
    rows
}

/// Per-weekday aggregates, busiest first.
pub fn trips_by_day(dataset: &Dataset) -> Vec<DayStats> {
    let mut weekend: HashMap<String, bool> = HashMap::new();
    for trip in dataset.trips() {
        weekend.entry(trip.day_of_week()).or_insert(trip.is_weekend());
    }

    let mut rows: Vec<DayStats> = group_trips(dataset, |t| t.day_of_week())
        .into_iter()
        .map(|(day, acc)| {
            let n = acc.count as f64;
            let is_weekend = *weekend.get(&day).unwrap_or(&false);
            DayStats {
                day_of_week: day,
                total_trips: acc.count,
                avg_fare: round2(acc.fare_sum / n),
                avg_distance: round2(acc.distance_sum / n),
                is_weekend,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.total_trips.cmp(&a.total_trips));
    rows
}

/// Most-traveled (pickup, dropoff) zone pairs, busiest first.
pub fn top_routes(dataset: &Dataset, limit: usize) -> Vec<RouteStats> {
    let mut rows: Vec<RouteStats> =
        group_trips(dataset, |t| (t.pickup_location_id, t.dropoff_location_id))
            .into_iter()
            .map(|((pickup, dropoff), acc)| {
                let n = acc.count as f64;
                RouteStats {
                    pickup_zone: dataset.zone_name(pickup).unwrap_or("Unknown").to_string(),
                    dropoff_zone: dataset.zone_name(dropoff).unwrap_or("Unknown").to_string(),
                    pickup_borough: dataset.borough(pickup).to_string(),
                    dropoff_borough: dataset.borough(dropoff).to_string(),
                    total_trips: acc.count,
                    avg_fare: round2(acc.fare_sum / n),
                    avg_distance: round2(acc.distance_sum / n),
                }
            })
            .collect();

    rows.sort_by(|a, b| b.total_trips.cmp(&a.total_trips));
    rows.truncate(limit);
    rows
}

/// Distinct known boroughs, alphabetical, `Unknown` excluded.
pub fn known_boroughs(dataset: &Dataset) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for zone in dataset.zones() {
        if zone.borough != crate::dataset::UNKNOWN_BOROUGH && !seen.contains(&zone.borough) {
            seen.push(zone.borough.clone());
        }
    }
    seen.sort();
    seen
}
