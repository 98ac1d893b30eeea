//! Response DTOs for the HTTP API
//!
//! Every body carries an `ok` flag so clients can branch without looking at
//! the status code.

use serde::Serialize;

use crate::cache::{CacheStats, SharedTierState};
use crate::geocoding::GeocodeResult;
use crate::service::NearbyLookup;
use crate::stores::NearbyStore;

/// Response body for `GET /api/geocode`
///
/// `result` is `null` when the provider found nothing.
#[derive(Debug, Clone, Serialize)]
pub struct GeocodeResponse {
    pub ok: bool,
    pub result: Option<GeocodeResult>,
}

impl GeocodeResponse {
    pub fn found(result: GeocodeResult) -> Self {
        Self {
            ok: true,
            result: Some(result),
        }
    }

    pub fn not_found() -> Self {
        Self {
            ok: true,
            result: None,
        }
    }
}

/// Response body for `GET /api/stores/nearby`
#[derive(Debug, Clone, Serialize)]
pub struct NearbyStoresResponse {
    pub ok: bool,
    pub stores: Vec<NearbyStore>,
    pub cached: bool,
    pub degraded: bool,
}

impl From<NearbyLookup> for NearbyStoresResponse {
    fn from(lookup: NearbyLookup) -> Self {
        Self {
            ok: true,
            stores: lookup.stores,
            cached: lookup.cached,
            degraded: lookup.degraded,
        }
    }
}

/// Response body for `GET /api/stores/:id`
#[derive(Debug, Clone, Serialize)]
pub struct StoreResponse {
    pub ok: bool,
    pub store: NearbyStore,
}

impl From<NearbyStore> for StoreResponse {
    fn from(store: NearbyStore) -> Self {
        Self { ok: true, store }
    }
}

/// Response body for `GET /api/cache/stats`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsResponse {
    pub ok: bool,
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    pub total_entries: usize,
    /// hits / (hits + misses)
    pub hit_rate: f64,
    pub shared_tier: SharedTierState,
    pub shared_errors: u64,
    pub registered_stores: usize,
}

impl CacheStatsResponse {
    pub fn new(
        stats: &CacheStats,
        shared_tier: SharedTierState,
        shared_errors: u64,
        registered_stores: usize,
    ) -> Self {
        Self {
            ok: true,
            hits: stats.hits,
            misses: stats.misses,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
            shared_tier,
            shared_errors,
            registered_stores,
        }
    }
}

/// Response body for `GET /api/health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            ok: true,
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
        }
    }
}
