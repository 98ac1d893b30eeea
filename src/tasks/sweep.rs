//! Expiry Sweep Task
//!
//! Background task that periodically removes expired in-process cache
//! entries. Reads already evict lazily; the sweep bounds memory held by keys
//! that are never read again.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MemoryTier;

/// Spawns a task that sweeps `tier` every `interval_secs` seconds.
///
/// The returned handle is aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = NearbyStoresCache::in_memory();
/// let sweep = spawn_cleanup_task(cache.memory_tier(), 60);
/// // Later, during shutdown:
/// sweep.abort();
/// ```
pub fn spawn_cleanup_task(tier: Arc<RwLock<MemoryTier>>, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(interval_secs, "starting cache expiry sweep");

        loop {
            tokio::time::sleep(interval).await;

            let removed = tier.write().await.cleanup_expired();

            if removed > 0 {
                info!(removed, "expiry sweep removed expired entries");
            } else {
                debug!("expiry sweep found nothing to remove");
            }
        }
    })
}
