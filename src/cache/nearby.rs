//! Nearby-Store Cache
//!
//! Two-tier cache of nearby-store lookups keyed by a 4-decimal coordinate
//! bucket. The shared tier is read first when connected; the in-process tier
//! is always written and answers reads whenever the shared tier cannot.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::debug;

use super::memory::MemoryTier;
use super::shared::{SharedRead, SharedTier, SharedTierState};
use super::CacheStats;
use crate::stores::NearbyStore;

/// Lifetime of every cached lookup, in both tiers.
pub const CACHE_TTL: Duration = Duration::from_secs(10 * 60);

/// Builds the cache key for a coordinate, rounding both parts to 4 decimals
/// (roughly 11 m at the equator).
///
/// Halfway values round away from zero and negative zero prints as `0.0000`,
/// so keys match those written by other instances sharing the cache.
pub fn build_cache_key(lat: f64, lng: f64) -> String {
    format!(
        "nearbyStores:{:.4}:{:.4}",
        round_to_bucket(lat),
        round_to_bucket(lng)
    )
}

fn round_to_bucket(value: f64) -> f64 {
    // `+ 0.0` folds -0.0 into 0.0
    (value * 10_000.0).round() / 10_000.0 + 0.0
}

// == Nearby Stores Cache ==
#[derive(Debug, Clone)]
pub struct NearbyStoresCache {
    memory: Arc<RwLock<MemoryTier>>,
    shared: Arc<SharedTier>,
}

impl NearbyStoresCache {
    pub fn new(shared: SharedTier) -> Self {
        Self {
            memory: Arc::new(RwLock::new(MemoryTier::new(CACHE_TTL))),
            shared: Arc::new(shared),
        }
    }

    /// A cache with only the in-process tier.
    pub fn in_memory() -> Self {
        Self::new(SharedTier::disabled())
    }

    /// Handle to the in-process tier, for the expiry sweep.
    pub fn memory_tier(&self) -> Arc<RwLock<MemoryTier>> {
        self.memory.clone()
    }

    // == Get ==
    /// Looks `key` up, shared tier first.
    ///
    /// A shared-tier miss is final; the in-process tier is only consulted when
    /// the shared tier is unavailable or fails.
    pub async fn get(&self, key: &str) -> Option<Vec<NearbyStore>> {
        match self.shared.get(key).await {
            SharedRead::Hit(stores) => {
                debug!(key, tier = "shared", "cache hit");
                return Some(stores);
            }
            SharedRead::Miss => {
                debug!(key, tier = "shared", "cache miss");
                return None;
            }
            SharedRead::Unavailable => {}
        }

        let found = self.memory.write().await.get(key);
        debug!(key, tier = "memory", hit = found.is_some(), "cache lookup");
        found
    }

    // == Set ==
    /// Writes the in-process tier, then writes through to the shared tier.
    pub async fn set(&self, key: &str, stores: Vec<NearbyStore>) {
        self.memory
            .write()
            .await
            .set(key.to_string(), stores.clone());

        self.shared.set(key, &stores, CACHE_TTL).await;
    }

    // == Clear ==
    /// Empties the in-process tier. The shared tier is left alone.
    pub async fn clear(&self) {
        self.memory.write().await.clear();
    }

    pub async fn stats(&self) -> CacheStats {
        self.memory.read().await.stats()
    }

    pub fn shared_state(&self) -> SharedTierState {
        self.shared.state()
    }

    pub fn shared_errors(&self) -> u64 {
        self.shared.error_count()
    }
}
