//! Nearby Grocer - grocery store lookup service
//!
//! Geocodes addresses and finds nearby grocery stores through throttled
//! OpenStreetMap providers, caching store lookups in a two-tier TTL cache.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod geo;
pub mod geocoding;
pub mod models;
pub mod service;
pub mod stores;
pub mod tasks;
pub mod throttle;
pub mod upstream;

pub use api::AppState;
pub use config::Config;
pub use service::{NearbyLookup, NearbyStoresService};
pub use tasks::spawn_cleanup_task;
