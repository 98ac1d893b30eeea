//! Background Tasks Module
//!
//! # Tasks
//! - Expiry sweep: drops expired in-process cache entries at a fixed interval

mod sweep;

pub use sweep::spawn_cleanup_task;
