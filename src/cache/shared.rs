//! Shared Tier
//!
//! Redis-backed cache tier reached through a lazily established, process-wide
//! connection. Every failure here is logged and absorbed: callers only ever
//! see a hit, a miss, or "unavailable".

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::stores::NearbyStore;

// == Shared Cache Error ==
#[derive(Error, Debug)]
pub enum SharedCacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("cached value is not valid JSON: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("redis connection timed out after {0:?}")]
    ConnectTimeout(Duration),
}

/// Connection lifecycle of the shared tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SharedTierState {
    /// No URL configured
    Disabled,
    /// Nobody has needed the connection yet
    Unconnected,
    /// The single connection attempt is in flight
    Connecting,
    Connected,
    /// The attempt failed; the tier stays off for the process lifetime
    Failed,
}

/// Outcome of a shared-tier read.
#[derive(Debug, Clone, PartialEq)]
pub enum SharedRead {
    Hit(Vec<NearbyStore>),
    Miss,
    /// Not connected or the read failed; consult the in-process tier
    Unavailable,
}

// == Shared Tier ==
pub struct SharedTier {
    url: Option<String>,
    connect_timeout: Duration,
    /// Set once by the first caller; concurrent first callers await the same attempt
    connection: OnceCell<Option<ConnectionManager>>,
    connecting: AtomicBool,
    errors: AtomicU64,
}

impl SharedTier {
    /// A shared tier that connects to `url` on first use.
    pub fn new(url: impl Into<String>, connect_timeout: Duration) -> Self {
        Self {
            url: Some(url.into()),
            connect_timeout,
            connection: OnceCell::new(),
            connecting: AtomicBool::new(false),
            errors: AtomicU64::new(0),
        }
    }

    /// A shared tier that is never used.
    pub fn disabled() -> Self {
        Self {
            url: None,
            connect_timeout: Duration::ZERO,
            connection: OnceCell::new(),
            connecting: AtomicBool::new(false),
            errors: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> SharedTierState {
        if self.url.is_none() {
            return SharedTierState::Disabled;
        }
        match self.connection.get() {
            Some(Some(_)) => SharedTierState::Connected,
            Some(None) => SharedTierState::Failed,
            None if self.connecting.load(Ordering::Acquire) => SharedTierState::Connecting,
            None => SharedTierState::Unconnected,
        }
    }

    /// Number of connect, read and write failures seen so far.
    pub fn error_count(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    // == Connection ==
    /// Returns the memoized connection, attempting it on first use.
    async fn connection(&self) -> Option<ConnectionManager> {
        let url = self.url.as_deref()?;

        self.connection
            .get_or_init(|| async {
                let in_flight = ConnectingGuard::new(&self.connecting);
                let result = connect(url, self.connect_timeout).await;
                drop(in_flight);

                match result {
                    Ok(manager) => {
                        info!("shared cache connected");
                        Some(manager)
                    }
                    Err(err) => {
                        self.record_error();
                        warn!(error = %err, "redis unavailable, using memory cache");
                        None
                    }
                }
            })
            .await
            .clone()
    }

    // == Get ==
    pub async fn get(&self, key: &str) -> SharedRead {
        let Some(mut conn) = self.connection().await else {
            return SharedRead::Unavailable;
        };

        match read(&mut conn, key).await {
            Ok(Some(stores)) => SharedRead::Hit(stores),
            Ok(None) => SharedRead::Miss,
            Err(err) => {
                self.record_error();
                warn!(error = %err, key, "redis read failed");
                SharedRead::Unavailable
            }
        }
    }

    // == Set ==
    /// Writes `stores` with a millisecond TTL. Returns whether the write landed.
    pub async fn set(&self, key: &str, stores: &[NearbyStore], ttl: Duration) -> bool {
        let Some(mut conn) = self.connection().await else {
            return false;
        };

        match write(&mut conn, key, stores, ttl).await {
            Ok(()) => true,
            Err(err) => {
                self.record_error();
                warn!(error = %err, key, "redis write failed");
                false
            }
        }
    }

    fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }
}

impl std::fmt::Debug for SharedTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedTier")
            .field("state", &self.state())
            .field("connect_timeout", &self.connect_timeout)
            .field("errors", &self.error_count())
            .finish()
    }
}

/// Marks a connection attempt as in flight until dropped, including when the
/// caller that owns the attempt is cancelled mid-connect.
struct ConnectingGuard<'a>(&'a AtomicBool);

impl<'a> ConnectingGuard<'a> {
    fn new(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for ConnectingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

async fn read(
    conn: &mut ConnectionManager,
    key: &str,
) -> Result<Option<Vec<NearbyStore>>, SharedCacheError> {
    let raw: Option<String> = conn.get(key).await?;
    match raw {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

async fn write(
    conn: &mut ConnectionManager,
    key: &str,
    stores: &[NearbyStore],
    ttl: Duration,
) -> Result<(), SharedCacheError> {
    let payload = serde_json::to_string(stores)?;
    let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
    conn.pset_ex::<_, _, ()>(key, payload, ttl_ms).await?;
    Ok(())
}

async fn connect(url: &str, timeout: Duration) -> Result<ConnectionManager, SharedCacheError> {
    let client = redis::Client::open(url)?;
    let manager = tokio::time::timeout(timeout, ConnectionManager::new(client))
        .await
        .map_err(|_| SharedCacheError::ConnectTimeout(timeout))??;
    Ok(manager)
}
