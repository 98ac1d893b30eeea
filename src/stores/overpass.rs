//! Overpass store fetcher.

use std::sync::Arc;

use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::normalize::normalize_elements;
use super::types::{NearbyStore, RawElement};
use crate::config::ConfigError;
use crate::geo::Coordinate;
use crate::throttle::Throttler;
use crate::upstream::body_snippet;

/// Search radius used when the caller does not give one.
pub const DEFAULT_RADIUS_METERS: u32 = 2500;

/// Number of stores returned when the caller does not give a limit.
pub const DEFAULT_LIMIT: usize = 5;

// == Nearby Query ==
/// Parameters of one nearby-store lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyQuery {
    pub origin: Coordinate,
    pub radius_meters: Option<u32>,
    pub limit: Option<usize>,
}

impl NearbyQuery {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            origin: Coordinate::new(lat, lng),
            radius_meters: None,
            limit: None,
        }
    }

    pub fn radius_meters(&self) -> u32 {
        self.radius_meters.unwrap_or(DEFAULT_RADIUS_METERS)
    }

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}

// == Store Fetch Error ==
/// Why a fetch degraded to an empty list.
#[derive(Error, Debug)]
pub enum StoreFetchError {
    #[error("overpass request failed with status {status}")]
    UpstreamStatus { status: StatusCode, body: String },

    #[error("overpass request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Builds the Overpass QL query for the four grocery categories.
pub fn build_overpass_query(origin: Coordinate, radius_meters: u32) -> String {
    let around = format!("(around:{},{},{})", radius_meters, origin.lat, origin.lng);
    format!(
        r#"
[out:json][timeout:25];
(
  node["shop"="supermarket"]{around};
  node["shop"="convenience"]{around};
  node["shop"="greengrocer"]{around};
  node["amenity"="marketplace"]{around};
);
out body;
"#
    )
}

/// Extracts decodable elements from an Overpass payload.
///
/// A missing or non-array `elements` field yields no elements; individual
/// entries that fail to decode are skipped.
pub fn parse_elements(body: &Value) -> Vec<RawElement> {
    let Some(items) = body.get("elements").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match RawElement::deserialize(item) {
            Ok(element) => Some(element),
            Err(e) => {
                debug!(error = %e, "skipping undecodable overpass element");
                None
            }
        })
        .collect()
}

// == Overpass Client ==
/// Throttled client for the Overpass interpreter endpoint.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    http: Client,
    endpoint: Url,
    user_agent: String,
    throttler: Arc<Throttler>,
}

impl OverpassClient {
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `endpoint` is not a valid URL.
    pub fn new(
        http: Client,
        endpoint: &str,
        user_agent: impl Into<String>,
        throttler: Arc<Throttler>,
    ) -> Result<Self, ConfigError> {
        let endpoint = Url::parse(endpoint).map_err(|e| ConfigError::Invalid {
            key: "OVERPASS_BASE_URL",
            reason: format!("invalid URL '{endpoint}': {e}"),
        })?;

        Ok(Self {
            http,
            endpoint,
            user_agent: user_agent.into(),
            throttler,
        })
    }

    // == Fetch ==
    /// Best-effort lookup: upstream failures are logged and yield an empty list.
    pub async fn fetch_nearby_stores(&self, query: &NearbyQuery) -> Vec<NearbyStore> {
        match self.try_fetch_nearby_stores(query).await {
            Ok(stores) => stores,
            Err(err) => {
                log_fetch_error(&err);
                Vec::new()
            }
        }
    }

    /// Same as [`fetch_nearby_stores`](Self::fetch_nearby_stores) but reports
    /// why a lookup degraded instead of hiding it.
    ///
    /// # Errors
    ///
    /// - [`StoreFetchError::UpstreamStatus`] on a non-2xx response.
    /// - [`StoreFetchError::Transport`] if no response was received.
    pub async fn try_fetch_nearby_stores(
        &self,
        query: &NearbyQuery,
    ) -> Result<Vec<NearbyStore>, StoreFetchError> {
        let ql = build_overpass_query(query.origin, query.radius_meters());

        self.throttler.acquire().await;

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .header(ACCEPT, "application/json")
            .form(&[("data", ql.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreFetchError::UpstreamStatus {
                status,
                body: body_snippet(&body),
            });
        }

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "overpass returned a non-JSON body");
                Value::Null
            }
        };

        let elements = parse_elements(&body);
        let mut stores = normalize_elements(query.origin, &elements);
        stores.truncate(query.limit());

        debug!(
            elements = elements.len(),
            stores = stores.len(),
            "overpass lookup complete"
        );
        Ok(stores)
    }
}

/// Logs a degraded fetch at warn level.
pub fn log_fetch_error(err: &StoreFetchError) {
    match err {
        StoreFetchError::UpstreamStatus { status, body } => {
            warn!(status = status.as_u16(), body = %body, "overpass upstream error");
        }
        StoreFetchError::Transport(e) => {
            warn!(error = %e, "overpass request failed");
        }
    }
}
