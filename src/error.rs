//! Error types for the HTTP layer
//!
//! Maps domain failures onto JSON error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::geocoding::GeocodingError;
use crate::models::ErrorResponse;

// == App Error Enum ==
/// Errors that reach a route boundary.
#[derive(Error, Debug)]
pub enum AppError {
    /// Query parameters failed validation
    #[error("{0}")]
    InvalidRequest(String),

    /// Geocoding failed for a reason other than "no results"
    #[error("geocoding failed: {0}")]
    Geocoding(#[from] GeocodingError),

    /// No record with the requested id
    #[error("{0}")]
    NotFound(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Geocoding(_) => (StatusCode::BAD_GATEWAY, "Geocoding failed".to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for route handlers.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode as UpstreamStatus;

    #[test]
    fn test_status_mapping() {
        let invalid = AppError::InvalidRequest("lat must be a number".into()).into_response();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let upstream = AppError::from(GeocodingError::UpstreamStatus {
            status: UpstreamStatus::TOO_MANY_REQUESTS,
        })
        .into_response();
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);

        let missing = AppError::NotFound("Store not found".into()).into_response();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
