//! HTTP API handlers.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::types::{AppContext, Measurement};

/// Build the service router with tracing and CORS layers applied.
pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .route("/health", get(api_health))
        .route("/api/condenses-performance", get(api_performance))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}

// ---------------------------------------------------------------------------
// Benchmark results
// ---------------------------------------------------------------------------

/// `GET /api/condenses-performance` — run a fresh benchmark and return it.
///
/// Every request pays the full re-computation cost: up to ten sequential
/// round-trips to the compression service. The response is always `200 OK`;
/// failed samples appear as `"compressed": -1` inside the array.
pub async fn api_performance(State(ctx): State<AppContext>) -> Json<Vec<Measurement>> {
    Json(ctx.runner.run().await)
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
    dataset_entries: usize,
    has_batch: bool,
    uptime_secs: u64,
}

/// `GET /health` — liveness probe. Unlike the results endpoint, this never
/// touches the network.
pub async fn api_health(State(ctx): State<AppContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        dataset_entries: ctx.runner.dataset_len(),
        has_batch: ctx.runner.latest().is_some(),
        uptime_secs: ctx.start_time.elapsed().as_secs(),
    })
}
