//! API Routes
//!
//! Configures the Axum router with all endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_stats_handler, geocode_handler, health_handler, nearby_stores_handler, store_handler,
    AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/health` - Health check
/// - `GET /api/geocode?q=` - Resolve an address to coordinates
/// - `GET /api/stores/nearby?lat=&lng=` - Grocery stores near a point
/// - `GET /api/stores/:id` - A store recorded by an earlier lookup
/// - `GET /api/cache/stats` - Cache statistics
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/geocode", get(geocode_handler))
        .route("/api/stores/nearby", get(nearby_stores_handler))
        .route("/api/stores/:id", get(store_handler))
        .route("/api/cache/stats", get(cache_stats_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
