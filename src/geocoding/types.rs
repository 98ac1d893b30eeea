//! Geocoding result and error types.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Best-match coordinates for a free-text query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeResult {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Stable failure codes reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeocodingErrorCode {
    UpstreamError,
    NoResults,
    InvalidResponse,
}

impl GeocodingErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeocodingErrorCode::UpstreamError => "UPSTREAM_ERROR",
            GeocodingErrorCode::NoResults => "NO_RESULTS",
            GeocodingErrorCode::InvalidResponse => "INVALID_RESPONSE",
        }
    }
}

// == Geocoding Error ==
#[derive(Error, Debug)]
pub enum GeocodingError {
    /// Provider answered with a non-success status
    #[error("geocoding request failed with status {status}")]
    UpstreamStatus { status: StatusCode },

    /// Request never produced a response (connect, DNS, timeout)
    #[error("geocoding request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Payload did not have the expected shape
    #[error("unexpected geocoding response: {0}")]
    InvalidResponse(String),

    /// Provider found nothing for the query
    #[error("no results")]
    NoResults,
}

impl GeocodingError {
    pub fn code(&self) -> GeocodingErrorCode {
        match self {
            GeocodingError::UpstreamStatus { .. } | GeocodingError::Transport(_) => {
                GeocodingErrorCode::UpstreamError
            }
            GeocodingError::InvalidResponse(_) => GeocodingErrorCode::InvalidResponse,
            GeocodingError::NoResults => GeocodingErrorCode::NoResults,
        }
    }

    /// Upstream status code, when the provider answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GeocodingError::UpstreamStatus { status } => Some(*status),
            GeocodingError::Transport(err) => err.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let upstream = GeocodingError::UpstreamStatus {
            status: StatusCode::SERVICE_UNAVAILABLE,
        };
        assert_eq!(upstream.code(), GeocodingErrorCode::UpstreamError);
        assert_eq!(upstream.status(), Some(StatusCode::SERVICE_UNAVAILABLE));

        assert_eq!(GeocodingError::NoResults.code().as_str(), "NO_RESULTS");
        assert_eq!(
            GeocodingError::InvalidResponse("bad".into()).code().as_str(),
            "INVALID_RESPONSE"
        );
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = GeocodeResult {
            lat: 47.61,
            lng: -122.33,
            display_name: Some("Seattle, WA".into()),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"lat": 47.61, "lng": -122.33, "displayName": "Seattle, WA"})
        );
    }

    #[test]
    fn test_code_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&GeocodingErrorCode::UpstreamError).unwrap();
        assert_eq!(json, "\"UPSTREAM_ERROR\"");
    }
}
