//! API Module
//!
//! HTTP handlers and routing for the nearby-store service.
//!
//! # Endpoints
//! - `GET /api/health` - Health check endpoint
//! - `GET /api/geocode` - Geocode a free-text address
//! - `GET /api/stores/nearby` - Nearby grocery stores for a coordinate
//! - `GET /api/stores/:id` - A previously returned store
//! - `GET /api/cache/stats` - Cache statistics

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
