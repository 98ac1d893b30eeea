//! Request DTOs for the HTTP API
//!
//! Query-string parameters arrive as optional strings and are validated into
//! typed values here, so every malformed input maps to the same JSON 400.

use serde::Deserialize;

use crate::geo::Coordinate;
use crate::stores::NearbyQuery;

/// Shortest accepted geocoding query, in characters.
pub const MIN_QUERY_CHARS: usize = 3;

/// Longest accepted geocoding query, in characters.
pub const MAX_QUERY_CHARS: usize = 200;

/// Largest accepted search radius in meters.
pub const MAX_RADIUS_METERS: u32 = 50_000;

/// Largest accepted result limit.
pub const MAX_LIMIT: usize = 50;

/// Query parameters for `GET /api/geocode`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeParams {
    /// Free-text address
    pub q: Option<String>,
}

impl GeocodeParams {
    /// Returns the trimmed query or a validation message.
    pub fn validate(&self) -> Result<String, String> {
        let q = self.q.as_deref().map(str::trim).unwrap_or("");
        let len = q.chars().count();

        if len < MIN_QUERY_CHARS {
            return Err(format!("q must be at least {MIN_QUERY_CHARS} characters"));
        }
        if len > MAX_QUERY_CHARS {
            return Err(format!("q must be at most {MAX_QUERY_CHARS} characters"));
        }
        Ok(q.to_string())
    }
}

/// Query parameters for `GET /api/stores/nearby`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius_meters: Option<String>,
    pub limit: Option<String>,
}

impl NearbyParams {
    /// Parses and range-checks the parameters, joining all problems into one
    /// message.
    pub fn validate(&self) -> Result<NearbyQuery, String> {
        let mut problems = Vec::new();

        let lat = parse_number(self.lat.as_deref()).filter(|v| Coordinate::is_valid_lat(*v));
        if lat.is_none() {
            problems.push("lat must be a number between -90 and 90".to_string());
        }

        let lng = parse_number(self.lng.as_deref()).filter(|v| Coordinate::is_valid_lng(*v));
        if lng.is_none() {
            problems.push("lng must be a number between -180 and 180".to_string());
        }

        let radius_meters = match self.radius_meters.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<u32>() {
                Ok(r) if r > 0 && r <= MAX_RADIUS_METERS => Some(r),
                _ => {
                    problems.push(format!(
                        "radiusMeters must be an integer between 1 and {MAX_RADIUS_METERS}"
                    ));
                    None
                }
            },
        };

        let limit = match self.limit.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<usize>() {
                Ok(l) if l > 0 && l <= MAX_LIMIT => Some(l),
                _ => {
                    problems.push(format!("limit must be an integer between 1 and {MAX_LIMIT}"));
                    None
                }
            },
        };

        match (lat, lng) {
            (Some(lat), Some(lng)) if problems.is_empty() => Ok(NearbyQuery {
                origin: Coordinate::new(lat, lng),
                radius_meters,
                limit,
            }),
            _ => Err(problems.join("; ")),
        }
    }
}

fn parse_number(raw: Option<&str>) -> Option<f64> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}
