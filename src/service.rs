//! Nearby-Store Lookup Service
//!
//! Ties the cache, the Overpass fetcher and the store registry together:
//! cache hit → return; miss → fetch, cache, record, return.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::cache::{build_cache_key, NearbyStoresCache};
use crate::stores::{
    log_fetch_error, NearbyQuery, NearbyStore, OverpassClient, StoreRegistry, DEFAULT_LIMIT,
    DEFAULT_RADIUS_METERS,
};

/// Result of one lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyLookup {
    pub stores: Vec<NearbyStore>,
    /// Served from cache without contacting the provider
    pub cached: bool,
    /// The provider failed and `stores` is an empty stand-in
    pub degraded: bool,
}

/// Cache key for a query. Default radius/limit use the plain bucket key;
/// other parameters get their own keys so results never mix.
pub fn cache_key_for(query: &NearbyQuery) -> String {
    let key = build_cache_key(query.origin.lat, query.origin.lng);
    let radius = query.radius_meters();
    let limit = query.limit();

    if radius == DEFAULT_RADIUS_METERS && limit == DEFAULT_LIMIT {
        key
    } else {
        format!("{key}:{radius}:{limit}")
    }
}

// == Nearby Stores Service ==
#[derive(Debug, Clone)]
pub struct NearbyStoresService {
    cache: NearbyStoresCache,
    fetcher: OverpassClient,
    registry: Arc<StoreRegistry>,
}

impl NearbyStoresService {
    pub fn new(
        cache: NearbyStoresCache,
        fetcher: OverpassClient,
        registry: Arc<StoreRegistry>,
    ) -> Self {
        Self {
            cache,
            fetcher,
            registry,
        }
    }

    pub fn cache(&self) -> &NearbyStoresCache {
        &self.cache
    }

    pub fn registry(&self) -> &StoreRegistry {
        &self.registry
    }

    // == Lookup ==
    /// Never fails. A degraded fetch is reported through
    /// [`NearbyLookup::degraded`] and is not cached.
    pub async fn lookup(&self, query: &NearbyQuery) -> NearbyLookup {
        let key = cache_key_for(query);

        if let Some(stores) = self.cache.get(&key).await {
            return NearbyLookup {
                stores,
                cached: true,
                degraded: false,
            };
        }

        match self.fetcher.try_fetch_nearby_stores(query).await {
            Ok(stores) => {
                self.cache.set(&key, stores.clone()).await;
                self.registry.upsert_all(&stores).await;
                info!(key = %key, count = stores.len(), "nearby stores fetched");

                NearbyLookup {
                    stores,
                    cached: false,
                    degraded: false,
                }
            }
            Err(err) => {
                log_fetch_error(&err);
                NearbyLookup {
                    stores: Vec::new(),
                    cached: false,
                    degraded: true,
                }
            }
        }
    }
}
