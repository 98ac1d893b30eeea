//! Cache Entry Module
//!
//! Defines the in-process cache entry with an absolute expiry instant.

use std::time::Duration;

use tokio::time::Instant;

use crate::stores::NearbyStore;

// == Cache Entry ==
/// A cached store list and the instant it stops being valid.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cached stores
    pub value: Vec<NearbyStore>,
    /// When the entry was written
    pub created_at: Instant,
    /// First instant at which the entry is expired
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry that expires `ttl` from now.
    pub fn new(value: Vec<NearbyStore>, ttl: Duration) -> Self {
        let now = Instant::now();
        Self {
            value,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired once the current time is
    /// greater than or equal to `expires_at`.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    // == Time To Live ==
    /// Remaining lifetime, zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}
