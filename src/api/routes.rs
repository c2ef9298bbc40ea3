//! HTTP route wiring.

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::Level;

use crate::api::handlers;
use crate::dataset::Dataset;

/// Builds the API router over a read-only dataset snapshot.
///
/// CORS is fully open: the dashboard frontend is served separately and the
/// API exposes nothing but derived aggregates.
pub fn create_router(dataset: Arc<Dataset>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/stats", get(handlers::stats))
        .route("/api/boroughs", get(handlers::boroughs))
        .route("/api/trips", get(handlers::trips))
        .route("/api/trips/by-borough", get(handlers::by_borough))
        .route("/api/trips/by-hour", get(handlers::by_hour))
        .route("/api/trips/by-day", get(handlers::by_day))
        .route("/api/trips/top-routes", get(handlers::routes))
        .route("/api/zones", get(handlers::zones))
        .route("/api/zone-rankings", get(handlers::zone_rankings))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::span!(
                    Level::INFO,
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive())
        .with_state(dataset)
}
