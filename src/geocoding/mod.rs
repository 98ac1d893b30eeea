//! Geocoding Module
//!
//! Resolves free-text addresses to coordinates through a single throttled
//! upstream provider (Nominatim).

mod nominatim;
mod types;

pub use nominatim::{parse_search_response, NominatimClient};
pub use types::{GeocodeResult, GeocodingError, GeocodingErrorCode};
