//! Mobility scoring: the fixed composite formula applied per zone.

use crate::ranking::types::{ScoredZone, ZoneAggregate};
use crate::ranking::utility::round2;

/// Trip volume is normalized by this before it enters the score.
pub const TRIP_COUNT_DIVISOR: f64 = 1000.0;
/// Average fare weight (economic activity).
pub const FARE_WEIGHT: f64 = 0.5;
/// Average distance weight (how far people travel from the zone).
pub const DISTANCE_WEIGHT: f64 = 2.0;

/// Composite mobility score for a zone aggregate.
///
/// `score = trip_count / 1000 + avg_fare * 0.5 + avg_distance * 2`,
/// rounded to two decimals. A pure function of the aggregate fields; no
/// cross-zone normalization.
pub fn mobility_score(agg: &ZoneAggregate) -> f64 {
    round2(
        agg.trip_count as f64 / TRIP_COUNT_DIVISOR
            + agg.avg_fare * FARE_WEIGHT
            + agg.avg_distance * DISTANCE_WEIGHT,
    )
}

/// Scores every aggregate, preserving input order.
pub fn score_zones(aggregates: Vec<ZoneAggregate>) -> Vec<ScoredZone> {
    aggregates
        .into_iter()
        .map(|agg| {
            let score = mobility_score(&agg);
            ScoredZone {
                zone_id: agg.zone_id,
                zone: agg.zone,
                borough: agg.borough,
                trip_count: agg.trip_count,
                avg_fare: agg.avg_fare,
                avg_distance: agg.avg_distance,
                score,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agg(zone_id: u32, trip_count: u64, avg_fare: f64, avg_distance: f64) -> ZoneAggregate {
        ZoneAggregate {
            zone_id,
            zone: format!("zone-{zone_id}"),
            borough: "Manhattan".to_string(),
            trip_count,
            avg_fare,
            avg_distance,
        }
    }

    #[test]
    fn test_score_formula() {
        // 500/1000 + 20*0.5 + 3*2 = 16.5
        assert_eq!(mobility_score(&agg(1, 500, 20.0, 3.0)), 16.5);
        // 2000/1000 + 10*0.5 + 1*2 = 9.0
        assert_eq!(mobility_score(&agg(2, 2000, 10.0, 1.0)), 9.0);
    }

    #[test]
    fn test_score_is_reproducible() {
        let a = agg(1, 1234, 13.37, 2.71);
        assert_eq!(mobility_score(&a), mobility_score(&a));
    }

    #[test]
    fn test_score_zones_preserves_order_and_fields() {
        let scored = score_zones(vec![agg(5, 500, 20.0, 3.0), agg(3, 2000, 10.0, 1.0)]);

        assert_eq!(scored.len(), 2);
        assert_eq!(scored[0].zone_id, 5);
        assert_eq!(scored[0].score, 16.5);
        assert_eq!(scored[0].trip_count, 500);
        assert_eq!(scored[1].zone_id, 3);
        assert_eq!(scored[1].score, 9.0);
    }
}
