//! Cache Module
//!
//! Two-tier TTL cache for nearby-store lookups: a Redis shared tier and an
//! in-process fallback tier.

mod entry;
mod memory;
mod nearby;
mod shared;
mod stats;


// Re-export public types
pub use entry::CacheEntry;
pub use memory::MemoryTier;
pub use nearby::{build_cache_key, NearbyStoresCache, CACHE_TTL};
pub use shared::{SharedCacheError, SharedRead, SharedTier, SharedTierState};
pub use stats::CacheStats;
