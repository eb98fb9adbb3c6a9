//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Cache Entry ==
/// A single time-stamped value.
///
/// This is also the durable record format: entries are written to storage
/// as `{"key", "data", "timestamp", "ttl"}` JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Key the entry was written under
    pub key: String,
    /// The cached payload, opaque to the cache
    pub data: Value,
    /// Write time (Unix milliseconds)
    pub timestamp: u64,
    /// Lifetime in milliseconds, measured from `timestamp`
    pub ttl: u64,
}

impl CacheEntry {
    // == Constructor ==
    pub fn new(key: impl Into<String>, data: Value, timestamp: u64, ttl: u64) -> Self {
        Self {
            key: key.into(),
            data,
            timestamp,
            ttl,
        }
    }

    // == Is Valid ==
    /// Checks the entry against the clock reading `now_ms`.
    ///
    /// Valid while `now - timestamp < ttl`; a reading before `timestamp`
    /// counts as no time elapsed. A zero TTL is never valid.
    pub fn is_valid_at(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.timestamp) < self.ttl
    }

    // == Expires At ==
    /// First instant (Unix milliseconds) at which the entry is expired.
    pub fn expires_at(&self) -> u64 {
        self.timestamp.saturating_add(self.ttl)
    }

    // == Time To Live ==
    /// Remaining lifetime in milliseconds; `0` once expired.
    pub fn ttl_remaining_ms(&self, now_ms: u64) -> u64 {
        self.expires_at().saturating_sub(now_ms.max(self.timestamp))
    }
}
