//! API Handlers
//!
//! HTTP request handlers for each endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use tracing::{error, info};

use crate::cache::{NearbyStoresCache, SharedTier};
use crate::config::{Config, ConfigError};
use crate::error::{AppError, Result};
use crate::geocoding::{GeocodingError, NominatimClient};
use crate::models::{
    CacheStatsResponse, GeocodeParams, GeocodeResponse, HealthResponse, NearbyParams,
    NearbyStoresResponse, StoreResponse,
};
use crate::service::NearbyStoresService;
use crate::stores::{OverpassClient, StoreRegistry};
use crate::throttle::Throttler;
use crate::upstream::build_http_client;

/// Application state shared across all handlers.
///
/// Both upstream clients own their throttler; every field is cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    pub geocoder: NominatimClient,
    pub nearby: NearbyStoresService,
}

impl AppState {
    pub fn new(geocoder: NominatimClient, nearby: NearbyStoresService) -> Self {
        Self { geocoder, nearby }
    }

    /// Builds the clients, throttlers, cache and registry from configuration.
    ///
    /// No network I/O happens here; the shared cache connects on first use.
    pub fn from_config(config: &Config) -> std::result::Result<Self, ConfigError> {
        let http = build_http_client(config)?;

        let geocoder = NominatimClient::new(
            http.clone(),
            &config.nominatim_base_url,
            config.user_agent.clone(),
            Arc::new(Throttler::from_millis("nominatim", config.geocoder_throttle_ms)),
        )?;

        let fetcher = OverpassClient::new(
            http,
            &config.overpass_base_url,
            config.user_agent.clone(),
            Arc::new(Throttler::from_millis("overpass", config.overpass_throttle_ms)),
        )?;

        let shared = match &config.redis_url {
            Some(url) => SharedTier::new(url.clone(), config.shared_cache_connect_timeout()),
            None => SharedTier::disabled(),
        };

        let nearby = NearbyStoresService::new(
            NearbyStoresCache::new(shared),
            fetcher,
            Arc::new(StoreRegistry::new()),
        );

        Ok(Self::new(geocoder, nearby))
    }

    pub fn cache(&self) -> &NearbyStoresCache {
        self.nearby.cache()
    }
}

fn request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// Handler for GET /api/geocode
///
/// "No results" is a successful `null` result; every other provider failure
/// is a 502.
pub async fn geocode_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<GeocodeParams>,
) -> Result<Json<GeocodeResponse>> {
    let q = params.validate().map_err(AppError::InvalidRequest)?;
    let request_id = request_id(&headers);

    info!(request_id = ?request_id, q = %q, provider = "nominatim", "geocode request");

    match state.geocoder.geocode(&q).await {
        Ok(result) => Ok(Json(GeocodeResponse::found(result))),
        Err(GeocodingError::NoResults) => Ok(Json(GeocodeResponse::not_found())),
        Err(err) => {
            error!(
                request_id = ?request_id,
                code = err.code().as_str(),
                status = ?err.status().map(|s| s.as_u16()),
                error = %err,
                "geocode failed"
            );
            Err(AppError::Geocoding(err))
        }
    }
}

/// Handler for GET /api/stores/nearby
///
/// Never fails once the parameters validate.
pub async fn nearby_stores_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<NearbyParams>,
) -> Result<Json<NearbyStoresResponse>> {
    let query = params.validate().map_err(AppError::InvalidRequest)?;

    info!(
        request_id = ?request_id(&headers),
        lat = query.origin.lat,
        lng = query.origin.lng,
        radius_meters = query.radius_meters(),
        limit = query.limit(),
        "nearby stores request"
    );

    let lookup = state.nearby.lookup(&query).await;
    Ok(Json(lookup.into()))
}

/// Handler for GET /api/stores/:id
///
/// Serves stores recorded by earlier nearby lookups.
pub async fn store_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoreResponse>> {
    match state.nearby.registry().get(&id).await {
        Some(store) => Ok(Json(store.into())),
        None => Err(AppError::NotFound("Store not found".to_string())),
    }
}

/// Handler for GET /api/cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    let cache = state.cache();
    let stats = cache.stats().await;
    let registered = state.nearby.registry().len().await;

    Json(CacheStatsResponse::new(
        &stats,
        cache.shared_state(),
        cache.shared_errors(),
        registered,
    ))
}

/// Handler for GET /api/health
pub async fn health_handler() -> Json<HealthResponse> {
    info!(route = "/api/health", "health check");
    Json(HealthResponse::healthy())
}

/// Config used by handler tests: unroutable upstreams, 1 ms throttles.
#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        nominatim_base_url: "http://127.0.0.1:9".to_string(),
        overpass_base_url: "http://127.0.0.1:9/api/interpreter".to_string(),
        geocoder_throttle_ms: 1,
        overpass_throttle_ms: 1,
        upstream_timeout_secs: 2,
        shared_cache_connect_timeout_ms: 100,
        ..Config::default()
    }
}
