//! Hoop Cache - tiered data cache for the team dashboard
//!
//! Keyed, expiring entries with FIFO overflow eviction, optional durable
//! persistence, a fetch-or-cache helper and mutation-driven invalidation.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod fetch;
pub mod invalidation;
pub mod keys;
pub mod models;
pub mod registry;
pub mod storage;

pub use api::AppState;
pub use cache::{CacheManager, SharedCache};
pub use config::Config;
pub use fetch::cached_call;
pub use registry::{CacheRegistry, CacheTier};
