//! Trip aggregation: groups cleaned trips by pickup zone and derives the
//! per-zone count and averages the scorer consumes.

use std::collections::HashMap;

use crate::dataset::Dataset;
use crate::ranking::types::ZoneAggregate;
use crate::ranking::utility::round2;

struct ZoneAccumulator {
    zone_id: u32,
    trip_count: u64,
    fare_sum: f64,
    distance_sum: f64,
}

/// Aggregates all trips by pickup zone id in a single pass.
///
/// Emission order is first-seen order over the trip sequence. The ranker's
/// stable sort breaks score ties by this order, so it must stay
/// deterministic for a given load.
///
/// Zones only appear with `trip_count >= 1`; averages never divide by zero.
pub fn aggregate_by_pickup_zone(dataset: &Dataset) -> Vec<ZoneAggregate> {
    let mut index: HashMap<u32, usize> = HashMap::new();
    let mut accs: Vec<ZoneAccumulator> = Vec::new();

    for trip in dataset.trips() {
        let slot = *index.entry(trip.pickup_location_id).or_insert_with(|| {
            accs.push(ZoneAccumulator {
                zone_id: trip.pickup_location_id,
                trip_count: 0,
                fare_sum: 0.0,
                distance_sum: 0.0,
            });
            accs.len() - 1
        });

        let acc = &mut accs[slot];
        acc.trip_count += 1;
        acc.fare_sum += trip.fare_amount;
        acc.distance_sum += trip.trip_distance;
    }

    accs.into_iter()
        .map(|acc| {
            let n = acc.trip_count as f64;
            ZoneAggregate {
                zone_id: acc.zone_id,
                zone: dataset
                    .zone_name(acc.zone_id)
                    .unwrap_or("Unknown")
                    .to_string(),
                borough: dataset.borough(acc.zone_id).to_string(),
                trip_count: acc.trip_count,
                avg_fare: round2(acc.fare_sum / n),
                avg_distance: round2(acc.distance_sum / n),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Trip, Zone};
    use chrono::NaiveDate;

    fn trip(zone_id: u32, fare: f64, distance: f64) -> Trip {
        Trip {
            pickup_datetime: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            pickup_location_id: zone_id,
            dropoff_location_id: 1,
            fare_amount: fare,
            trip_distance: distance,
            trip_duration_mins: 10.0,
        }
    }

    fn zone(id: u32, borough: &str, name: &str) -> Zone {
        Zone {
            location_id: id,
            borough: borough.to_string(),
            zone: name.to_string(),
            service_zone: None,
        }
    }

    #[test]
    fn test_groups_and_averages() {
        let dataset = Dataset::new(
            vec![
                trip(7, 10.0, 2.0),
                trip(7, 20.0, 4.0),
                trip(9, 5.0, 1.0),
            ],
            vec![zone(7, "Queens", "Astoria"), zone(9, "Brooklyn", "DUMBO")],
        );

        let aggs = aggregate_by_pickup_zone(&dataset);

        assert_eq!(aggs.len(), 2);
        assert_eq!(aggs[0].zone_id, 7);
        assert_eq!(aggs[0].trip_count, 2);
        assert_eq!(aggs[0].avg_fare, 15.0);
        assert_eq!(aggs[0].avg_distance, 3.0);
        assert_eq!(aggs[0].borough, "Queens");
        assert_eq!(aggs[1].zone_id, 9);
        assert_eq!(aggs[1].trip_count, 1);
    }

    #[test]
    fn test_emission_order_is_first_seen() {
        let dataset = Dataset::new(
            vec![trip(3, 1.0, 1.0), trip(1, 1.0, 1.0), trip(3, 1.0, 1.0), trip(2, 1.0, 1.0)],
            vec![],
        );

        let ids: Vec<u32> = aggregate_by_pickup_zone(&dataset)
            .iter()
            .map(|a| a.zone_id)
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_empty_input_empty_output() {
        let dataset = Dataset::new(vec![], vec![]);
        assert!(aggregate_by_pickup_zone(&dataset).is_empty());
    }

    #[test]
    fn test_unknown_zone_kept_under_unknown() {
        let dataset = Dataset::new(vec![trip(255, 8.0, 1.5)], vec![]);
        let aggs = aggregate_by_pickup_zone(&dataset);

        assert_eq!(aggs.len(), 1);
        assert_eq!(aggs[0].borough, "Unknown");
        assert_eq!(aggs[0].zone, "Unknown");
    }

    #[test]
    fn test_trip_count_sum_invariant() {
        let trips: Vec<Trip> = (0..50).map(|i| trip(i % 7, 10.0, 1.0)).collect();
        let total = trips.len() as u64;
        let dataset = Dataset::new(trips, vec![]);

        let sum: u64 = aggregate_by_pickup_zone(&dataset)
            .iter()
            .map(|a| a.trip_count)
            .sum();
        assert_eq!(sum, total);
    }
}
