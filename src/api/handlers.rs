//! Request handlers. Every endpoint recomputes from the read-only dataset
//! snapshot; there is no per-request mutable state.

use axum::extract::{Query, State};
use axum::response::Json;
use std::sync::Arc;

use crate::api::models::{
    ApiResponse, BoroughQuery, IndexInfo, LimitQuery, TripFilters, TripRow, TripsPage,
};
use crate::dataset::{Dataset, Zone};
use crate::ranking::rank_zones;
use crate::ranking::types::RankedZone;
use crate::stats::{
    BoroughStats, DayStats, HourStats, RouteStats, SummaryStats, known_boroughs, top_routes,
    trips_by_borough, trips_by_day, trips_by_hour,
};

const DEFAULT_TRIP_LIMIT: usize = 100;
const RANKING_LIMIT: usize = 20;

/// A borough filter must name a borough from the zone lookup (or the
/// `Unknown` bucket); anything else gets the error envelope rather than a
/// silently empty result.
fn check_borough_filter(dataset: &Dataset, borough: Option<&str>) -> Result<(), String> {
    match borough {
        Some(b)
            if b != crate::dataset::UNKNOWN_BOROUGH
                && !dataset.zones().iter().any(|z| z.borough == b) =>
        {
            Err(format!("unknown borough: {b}"))
        }
        _ => Ok(()),
    }
}

pub async fn index() -> Json<IndexInfo> {
    Json(IndexInfo {
        message: "NYC Taxi Explorer API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: vec![
            "/api/stats",
            "/api/boroughs",
            "/api/trips",
            "/api/trips/by-borough",
            "/api/trips/by-hour",
            "/api/trips/by-day",
            "/api/trips/top-routes",
            "/api/zones",
            "/api/zone-rankings",
        ],
    })
}

pub async fn stats(State(dataset): State<Arc<Dataset>>) -> Json<ApiResponse<SummaryStats>> {
    Json(ApiResponse::success(SummaryStats::from_dataset(&dataset)))
}

pub async fn boroughs(State(dataset): State<Arc<Dataset>>) -> Json<ApiResponse<Vec<String>>> {
    Json(ApiResponse::success(known_boroughs(&dataset)))
}

pub async fn trips(
    State(dataset): State<Arc<Dataset>>,
    Query(filters): Query<TripFilters>,
) -> Json<ApiResponse<TripsPage>> {
    if let Err(e) = check_borough_filter(&dataset, filters.borough.as_deref()) {
        return Json(ApiResponse::error(e));
    }

    let limit = filters.limit.unwrap_or(DEFAULT_TRIP_LIMIT);
    let offset = filters.offset.unwrap_or(0);

    let matching: Vec<&crate::dataset::Trip> = dataset
        .trips()
        .iter()
        .filter(|t| {
            filters
                .borough
                .as_deref()
                .map(|b| dataset.borough(t.pickup_location_id) == b)
                .unwrap_or(true)
                && filters
                    .time_of_day
                    .as_deref()
                    .map(|tod| t.time_of_day() == tod)
                    .unwrap_or(true)
                && filters
                    .day
                    .as_deref()
                    .map(|d| t.day_of_week() == d)
                    .unwrap_or(true)
        })
        .collect();

    let total = matching.len();
    let data = matching
        .into_iter()
        .skip(offset)
        .take(limit)
        .map(|t| TripRow::from_trip(t, &dataset))
        .collect();

    Json(ApiResponse::success(TripsPage {
        total,
        limit,
        offset,
        data,
    }))
}

pub async fn by_borough(
    State(dataset): State<Arc<Dataset>>,
) -> Json<ApiResponse<Vec<BoroughStats>>> {
    Json(ApiResponse::success(trips_by_borough(&dataset)))
}

pub async fn by_hour(
    State(dataset): State<Arc<Dataset>>,
    Query(query): Query<BoroughQuery>,
) -> Json<ApiResponse<Vec<HourStats>>> {
    if let Err(e) = check_borough_filter(&dataset, query.borough.as_deref()) {
        return Json(ApiResponse::error(e));
    }
    Json(ApiResponse::success(trips_by_hour(
        &dataset,
        query.borough.as_deref(),
    )))
}

pub async fn by_day(State(dataset): State<Arc<Dataset>>) -> Json<ApiResponse<Vec<DayStats>>> {
    Json(ApiResponse::success(trips_by_day(&dataset)))
}

pub async fn routes(
    State(dataset): State<Arc<Dataset>>,
    Query(query): Query<LimitQuery>,
) -> Json<ApiResponse<Vec<RouteStats>>> {
    let limit = query.limit.unwrap_or(10);
    Json(ApiResponse::success(top_routes(&dataset, limit)))
}

pub async fn zones(
    State(dataset): State<Arc<Dataset>>,
    Query(query): Query<BoroughQuery>,
) -> Json<ApiResponse<Vec<Zone>>> {
    let mut rows: Vec<Zone> = dataset
        .zones()
        .iter()
        .filter(|z| {
            query
                .borough
                .as_deref()
                .map(|b| z.borough == b)
                .unwrap_or(true)
        })
        .cloned()
        .collect();
    rows.sort_by(|a, b| (&a.borough, &a.zone).cmp(&(&b.borough, &b.zone)));

    Json(ApiResponse::success(rows))
}

pub async fn zone_rankings(
    State(dataset): State<Arc<Dataset>>,
) -> Json<ApiResponse<Vec<RankedZone>>> {
    let mut ranked = rank_zones(&dataset);
    ranked.truncate(RANKING_LIMIT);
    Json(ApiResponse::success(ranked))
}
