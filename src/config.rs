//! Configuration Module
//!
//! Handles loading and validating service configuration from environment
//! variables.

use std::env;
use std::time::Duration;

use thiserror::Error;

/// Default Nominatim instance.
pub const DEFAULT_NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Default Overpass interpreter endpoint.
pub const DEFAULT_OVERPASS_BASE_URL: &str = "https://overpass-api.de/api/interpreter";

// == Config Error ==
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Service configuration parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Geocoding provider base URL
    pub nominatim_base_url: String,
    /// Store provider interpreter endpoint
    pub overpass_base_url: String,
    /// User-Agent sent to both providers
    pub user_agent: String,
    /// Minimum milliseconds between geocoding requests
    pub geocoder_throttle_ms: u64,
    /// Minimum milliseconds between store lookups
    pub overpass_throttle_ms: u64,
    /// Shared cache URL; None disables the shared tier
    pub redis_url: Option<String>,
    /// Bound on the single lazy shared-cache connection attempt
    pub shared_cache_connect_timeout_ms: u64,
    /// Timeout applied to every upstream HTTP request
    pub upstream_timeout_secs: u64,
    /// Seconds between in-process expiry sweeps
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `NOMINATIM_BASE_URL` - geocoding provider (default: public Nominatim)
    /// - `OVERPASS_BASE_URL` - store provider (default: public Overpass)
    /// - `GEOCODER_USER_AGENT` - required
    /// - `GEOCODER_THROTTLE_MS` - geocoding spacing (default: 1100)
    /// - `OVERPASS_THROTTLE_MS` - store lookup spacing (default: 1100)
    /// - `REDIS_URL` - shared cache (default: unset, shared tier disabled)
    /// - `SHARED_CACHE_CONNECT_TIMEOUT_MS` - default 2000
    /// - `UPSTREAM_TIMEOUT_SECS` - default 30
    /// - `CLEANUP_INTERVAL` - expiry sweep frequency in seconds (default: 60)
    ///
    /// # Errors
    ///
    /// [`ConfigError::Missing`] if the user agent is unset or blank,
    /// [`ConfigError::Invalid`] if a numeric setting is malformed or zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let user_agent =
            get("GEOCODER_USER_AGENT").ok_or(ConfigError::Missing("GEOCODER_USER_AGENT"))?;

        Ok(Self {
            server_port: parse_positive(&get, "SERVER_PORT", defaults.server_port)?,
            nominatim_base_url: get("NOMINATIM_BASE_URL").unwrap_or(defaults.nominatim_base_url),
            overpass_base_url: get("OVERPASS_BASE_URL").unwrap_or(defaults.overpass_base_url),
            user_agent,
            geocoder_throttle_ms: parse_positive(
                &get,
                "GEOCODER_THROTTLE_MS",
                defaults.geocoder_throttle_ms,
            )?,
            overpass_throttle_ms: parse_positive(
                &get,
                "OVERPASS_THROTTLE_MS",
                defaults.overpass_throttle_ms,
            )?,
            redis_url: get("REDIS_URL"),
            shared_cache_connect_timeout_ms: parse_positive(
                &get,
                "SHARED_CACHE_CONNECT_TIMEOUT_MS",
                defaults.shared_cache_connect_timeout_ms,
            )?,
            upstream_timeout_secs: parse_positive(
                &get,
                "UPSTREAM_TIMEOUT_SECS",
                defaults.upstream_timeout_secs,
            )?,
            cleanup_interval: parse_positive(&get, "CLEANUP_INTERVAL", defaults.cleanup_interval)?,
        })
    }

    pub fn shared_cache_connect_timeout(&self) -> Duration {
        Duration::from_millis(self.shared_cache_connect_timeout_ms)
    }
}

/// Parses an optional positive integer setting.
fn parse_positive<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialEq + Default,
    G: Fn(&str) -> Option<String>,
{
    let Some(raw) = get(key) else {
        return Ok(default);
    };

    match raw.parse::<T>() {
        Ok(value) if value != T::default() => Ok(value),
        Ok(_) => Err(ConfigError::Invalid {
            key,
            reason: "must be a positive integer".to_string(),
        }),
        Err(_) => Err(ConfigError::Invalid {
            key,
            reason: format!("'{raw}' is not a positive integer"),
        }),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            nominatim_base_url: DEFAULT_NOMINATIM_BASE_URL.to_string(),
            overpass_base_url: DEFAULT_OVERPASS_BASE_URL.to_string(),
            user_agent: "nearby_grocer/0.1 (development)".to_string(),
            geocoder_throttle_ms: 1100,
            overpass_throttle_ms: 1100,
            redis_url: None,
            shared_cache_connect_timeout_ms: 2000,
            upstream_timeout_secs: 30,
            cleanup_interval: 60,
        }
    }
}
