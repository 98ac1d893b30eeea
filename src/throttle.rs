//! Request Throttler
//!
//! Enforces a minimum interval between successive outgoing requests to one
//! upstream provider. Each upstream client owns its own `Throttler`.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

// == Throttler ==
/// Serializes callers so that dispatch times are at least `interval` apart.
///
/// The whole "read last timestamp, wait, record new timestamp" sequence runs
/// under one async mutex, so concurrent callers queue up instead of computing
/// overlapping wait windows.
#[derive(Debug)]
pub struct Throttler {
    /// Label used in log output
    name: &'static str,
    /// Minimum spacing between dispatches
    interval: Duration,
    /// When the previous caller was released, None before the first call
    last_request: Mutex<Option<Instant>>,
}

impl Throttler {
    /// Creates a throttler that has never released a caller.
    pub fn new(name: &'static str, interval: Duration) -> Self {
        Self {
            name,
            interval,
            last_request: Mutex::new(None),
        }
    }

    /// Convenience constructor taking the interval in milliseconds.
    pub fn from_millis(name: &'static str, interval_ms: u64) -> Self {
        Self::new(name, Duration::from_millis(interval_ms))
    }

    // == Acquire ==
    /// Waits until the caller may dispatch its request.
    ///
    /// Returns the instant at which the caller was released.
    pub async fn acquire(&self) -> Instant {
        let mut last = self.last_request.lock().await;

        if let Some(previous) = *last {
            let ready_at = previous + self.interval;
            let now = Instant::now();
            if ready_at > now {
                debug!(
                    throttler = self.name,
                    wait_ms = (ready_at - now).as_millis() as u64,
                    "throttling upstream request"
                );
                tokio::time::sleep_until(ready_at).await;
            }
        }

        let released = Instant::now();
        *last = Some(released);
        released
    }
}
