//! Cache Module
//!
//! Keyed, expiring entries with lazy TTL checks, FIFO overflow eviction and
//! optional durable persistence.

mod entry;
mod manager;
mod order;
mod stats;

#[cfg(test)]
mod property_tests;

use std::sync::Arc;

use tokio::sync::RwLock;

// Re-export public types
pub use entry::CacheEntry;
pub use manager::CacheManager;
pub use order::InsertionOrder;
pub use stats::CacheStats;

// == Shared Handle ==
/// A cache instance shared across the application.
///
/// Reads take the write lock too, since a read may drop an expired entry
/// or pull one in from durable storage.
pub type SharedCache = Arc<RwLock<CacheManager>>;

// == Public Constants ==
/// Prefix prepended to cache keys in durable storage
pub const DEFAULT_STORAGE_PREFIX: &str = "cache_";

/// Maximum allowed key length in bytes, enforced at the HTTP boundary
pub const MAX_KEY_LENGTH: usize = 512;
