//! Store Registry
//!
//! In-process upsert-by-id record of every store the service has returned.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::types::NearbyStore;

/// Keeps the latest record seen for each store id.
#[derive(Debug, Default)]
pub struct StoreRegistry {
    stores: RwLock<HashMap<String, NearbyStore>>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `store`, replacing any earlier record with the same id.
    pub async fn upsert(&self, store: NearbyStore) {
        self.stores.write().await.insert(store.id.clone(), store);
    }

    /// Upserts every store in order; later duplicates win.
    pub async fn upsert_all(&self, stores: &[NearbyStore]) {
        for store in stores {
            self.upsert(store.clone()).await;
        }
    }

    pub async fn get(&self, id: &str) -> Option<NearbyStore> {
        self.stores.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.stores.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.stores.read().await.is_empty()
    }
}
