//! Stores Module
//!
//! Fetches candidate grocery stores from Overpass, normalizes them into a
//! deterministic nearest-first list, and records them by id.

mod normalize;
mod overpass;
mod registry;
mod types;


pub use normalize::{compare_stores, format_address, normalize_elements};
pub use overpass::{
    build_overpass_query, log_fetch_error, parse_elements, NearbyQuery, OverpassClient,
    StoreFetchError, DEFAULT_LIMIT, DEFAULT_RADIUS_METERS,
};
pub use registry::StoreRegistry;
pub use types::{ElementCenter, NearbyStore, RawElement, StoreSource};
