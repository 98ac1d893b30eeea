//! Nominatim geocoding client.

use std::sync::Arc;

use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::warn;

use super::types::{GeocodeResult, GeocodingError};
use crate::config::ConfigError;
use crate::throttle::Throttler;
use crate::upstream::{body_snippet, parse_base_url};

/// Client for the Nominatim `/search` endpoint.
///
/// Every request passes through the injected [`Throttler`] first, so the
/// provider never sees two requests closer together than its configured
/// interval from this process.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: Client,
    base_url: Url,
    user_agent: String,
    throttler: Arc<Throttler>,
}

impl NominatimClient {
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `base_url` is not a valid URL.
    pub fn new(
        http: Client,
        base_url: &str,
        user_agent: impl Into<String>,
        throttler: Arc<Throttler>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            http,
            base_url: parse_base_url("NOMINATIM_BASE_URL", base_url)?,
            user_agent: user_agent.into(),
            throttler,
        })
    }

    // == Geocode ==
    /// Resolves `query` to the provider's single best match.
    ///
    /// # Errors
    ///
    /// - [`GeocodingError::UpstreamStatus`] on a non-2xx response.
    /// - [`GeocodingError::Transport`] if no response was received.
    /// - [`GeocodingError::InvalidResponse`] if the payload is not an array or
    ///   the first result has non-numeric coordinates.
    /// - [`GeocodingError::NoResults`] if the provider returned an empty array.
    pub async fn geocode(&self, query: &str) -> Result<GeocodeResult, GeocodingError> {
        let mut url = self
            .base_url
            .join("search")
            .map_err(|e| GeocodingError::InvalidResponse(format!("cannot build URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("format", "jsonv2")
            .append_pair("limit", "1")
            .append_pair("q", query);

        self.throttler.acquire().await;

        let response = self
            .http
            .get(url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                body = %body_snippet(&body),
                "nominatim upstream error"
            );
            return Err(GeocodingError::UpstreamStatus { status });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| GeocodingError::InvalidResponse(format!("body is not JSON: {e}")))?;

        parse_search_response(&body)
    }
}

// == Response Validation ==
/// Validates a raw `/search` payload and extracts the first result.
pub fn parse_search_response(body: &Value) -> Result<GeocodeResult, GeocodingError> {
    let items = body
        .as_array()
        .ok_or_else(|| GeocodingError::InvalidResponse("expected a JSON array".into()))?;

    let first = items.first().ok_or(GeocodingError::NoResults)?;

    let lat = coordinate_field(first, "lat")?;
    let lng = coordinate_field(first, "lon")?;
    let display_name = first
        .get("display_name")
        .and_then(Value::as_str)
        .map(str::to_owned);

    Ok(GeocodeResult {
        lat,
        lng,
        display_name,
    })
}

/// Nominatim sends coordinates as strings; plain numbers are accepted too.
fn coordinate_field(item: &Value, field: &str) -> Result<f64, GeocodingError> {
    let parsed = match item.get(field) {
        Some(Value::String(raw)) => raw.trim().parse::<f64>().ok(),
        Some(Value::Number(n)) => n.as_f64(),
        _ => None,
    };

    parsed.filter(|v| v.is_finite()).ok_or_else(|| {
        GeocodingError::InvalidResponse(format!("non-numeric '{field}' in first result"))
    })
}
