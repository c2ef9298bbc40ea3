//! Zone mobility ranking pipeline.
//!
//! Aggregates cleaned trips by pickup zone, applies the composite mobility
//! score, orders the zones with the in-house stable insertion sort, and
//! assigns 1-based ranks.

pub mod aggregate;
pub mod score;
pub mod sort;
pub mod types;
pub mod utility;

use tracing::debug;

use crate::dataset::Dataset;
use crate::ranking::aggregate::aggregate_by_pickup_zone;
use crate::ranking::score::score_zones;
use crate::ranking::sort::insertion_sort_by_score;
use crate::ranking::types::RankedZone;

/// Runs the full aggregate → score → sort pipeline over the dataset
/// snapshot. Re-runs from scratch every call; identical input yields an
/// identical ranking.
pub fn rank_zones(dataset: &Dataset) -> Vec<RankedZone> {
    let aggregates = aggregate_by_pickup_zone(dataset);
    debug!(zones = aggregates.len(), "Zone aggregates computed");

    let mut scored = score_zones(aggregates);
    let comparisons = insertion_sort_by_score(&mut scored);
    debug!(comparisons, "Zones sorted by mobility score");

    scored
        .into_iter()
        .enumerate()
        .map(|(i, z)| RankedZone::from_scored(i + 1, z))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Trip;
    use chrono::NaiveDate;

    fn trips_for_zone(zone_id: u32, count: usize, fare: f64, distance: f64) -> Vec<Trip> {
        (0..count)
            .map(|_| Trip {
                pickup_datetime: NaiveDate::from_ymd_opt(2024, 1, 1)
                    .unwrap()
                    .and_hms_opt(9, 0, 0)
                    .unwrap(),
                pickup_location_id: zone_id,
                dropoff_location_id: 1,
                fare_amount: fare,
                trip_distance: distance,
                trip_duration_mins: 10.0,
            })
            .collect()
    }

    #[test]
    fn test_rank_zones_scenario() {
        // A: 500 trips, $20 avg, 3mi avg -> 16.5
        // B: 2000 trips, $10 avg, 1mi avg -> 9.0
        let mut trips = trips_for_zone(42, 500, 20.0, 3.0);
        trips.extend(trips_for_zone(43, 2000, 10.0, 1.0));
        let dataset = Dataset::new(trips, vec![]);

        let ranked = rank_zones(&dataset);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].zone_id, 42);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].score, 16.5);
        assert_eq!(ranked[1].zone_id, 43);
        assert_eq!(ranked[1].rank, 2);
        assert_eq!(ranked[1].score, 9.0);
    }

    #[test]
    fn test_rank_zones_empty_dataset() {
        let dataset = Dataset::new(vec![], vec![]);
        assert!(rank_zones(&dataset).is_empty());
    }

    #[test]
    fn test_rank_zones_idempotent() {
        let mut trips = trips_for_zone(1, 10, 12.0, 2.0);
        trips.extend(trips_for_zone(2, 30, 8.0, 1.0));
        trips.extend(trips_for_zone(3, 5, 25.0, 4.0));
        let dataset = Dataset::new(trips, vec![]);

        let first = rank_zones(&dataset);
        let second = rank_zones(&dataset);

        let a: Vec<(usize, u32, u64)> =
            first.iter().map(|z| (z.rank, z.zone_id, z.trip_count)).collect();
        let b: Vec<(usize, u32, u64)> =
            second.iter().map(|z| (z.rank, z.zone_id, z.trip_count)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_tied_scores_keep_aggregation_order() {
        // Identical trip profiles give identical scores; ranking must keep
        // the aggregator's first-seen order.
        let mut trips = trips_for_zone(100, 3, 10.0, 2.0);
        trips.extend(trips_for_zone(200, 3, 10.0, 2.0));
        trips.extend(trips_for_zone(300, 3, 10.0, 2.0));
        let dataset = Dataset::new(trips, vec![]);

        let ranked = rank_zones(&dataset);

        let ids: Vec<u32> = ranked.iter().map(|z| z.zone_id).collect();
        assert_eq!(ids, vec![100, 200, 300]);
        assert_eq!(ranked[0].score, ranked[2].score);
    }

    #[test]
    fn test_sum_invariant_and_total_order() {
        let mut trips = trips_for_zone(1, 7, 12.0, 2.0);
        trips.extend(trips_for_zone(2, 19, 9.0, 1.5));
        trips.extend(trips_for_zone(3, 4, 30.0, 6.0));
        let total = trips.len() as u64;
        let dataset = Dataset::new(trips, vec![]);

        let ranked = rank_zones(&dataset);

        let sum: u64 = ranked.iter().map(|z| z.trip_count).sum();
        assert_eq!(sum, total);

        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        for (i, z) in ranked.iter().enumerate() {
            assert_eq!(z.rank, i + 1);
        }
    }
}
