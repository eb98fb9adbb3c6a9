//! API Module
//!
//! HTTP handlers and routing for inspecting and invalidating the cache tiers.
//!
//! # Endpoints
//! - `PUT /tiers/:tier/entries` - Store a value
//! - `GET /tiers/:tier/entries/:key` - Read a value
//! - `DELETE /tiers/:tier/entries/:key` - Delete a key
//! - `GET /tiers/:tier/keys` - List in-memory keys
//! - `POST /tiers/:tier/invalidate` - Pattern invalidation
//! - `DELETE /tiers/:tier`, `DELETE /tiers` - Clear one or all tiers
//! - `POST /resources/:resource/invalidate` - Resource invalidation strategy
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
