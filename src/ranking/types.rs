//! Data types produced by the ranking pipeline.

use serde::Serialize;

/// Per-zone aggregate over the cleaned trips: running count and averages
/// for every zone with at least one observed pickup.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneAggregate {
    pub zone_id: u32,
    pub zone: String,
    pub borough: String,
    pub trip_count: u64,
    pub avg_fare: f64,
    pub avg_distance: f64,
}

/// A [`ZoneAggregate`] plus its mobility score. The score is computed once
/// from the aggregate fields and never revised.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredZone {
    pub zone_id: u32,
    pub zone: String,
    pub borough: String,
    pub trip_count: u64,
    pub avg_fare: f64,
    pub avg_distance: f64,
    pub score: f64,
}

/// Final ranking entry: 1-based rank over the descending score order.
#[derive(Debug, Clone, Serialize)]
pub struct RankedZone {
    pub rank: usize,
    pub zone_id: u32,
    pub zone: String,
    pub borough: String,
    pub trip_count: u64,
    pub avg_fare: f64,
    pub avg_distance: f64,
    pub score: f64,
}

impl RankedZone {
    pub fn from_scored(rank: usize, z: ScoredZone) -> Self {
        RankedZone {
            rank,
            zone_id: z.zone_id,
            zone: z.zone,
            borough: z.borough,
            trip_count: z.trip_count,
            avg_fare: z.avg_fare,
            avg_distance: z.avg_distance,
            score: z.score,
        }
    }
}
