//! Geo Module
//!
//! Coordinate value type and great-circle distance.

mod distance;


pub use distance::{haversine_distance_meters, to_radians, EARTH_RADIUS_METERS};

use serde::{Deserialize, Serialize};

// == Coordinate ==
/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns true if both components are finite and inside
    /// [-90, 90] / [-180, 180].
    pub fn is_valid(&self) -> bool {
        Self::is_valid_lat(self.lat) && Self::is_valid_lng(self.lng)
    }

    pub fn is_valid_lat(lat: f64) -> bool {
        lat.is_finite() && (-90.0..=90.0).contains(&lat)
    }

    pub fn is_valid_lng(lng: f64) -> bool {
        lng.is_finite() && (-180.0..=180.0).contains(&lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_ranges() {
        assert!(Coordinate::new(90.0, -180.0).is_valid());
        assert!(!Coordinate::new(90.01, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, 180.5).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
        assert!(!Coordinate::is_valid_lng(f64::INFINITY));
    }
}
