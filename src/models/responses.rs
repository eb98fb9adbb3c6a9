//! Response DTOs for the cache HTTP API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;

/// Response body for `GET /tiers/:tier/entries/:key`
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub tier: String,
    pub key: String,
    pub value: Value,
    /// Milliseconds until the entry expires
    pub ttl_remaining_ms: u64,
}

impl GetResponse {
    pub fn new(
        tier: impl Into<String>,
        key: impl Into<String>,
        value: Value,
        ttl_remaining: Duration,
    ) -> Self {
        Self {
            tier: tier.into(),
            key: key.into(),
            value,
            ttl_remaining_ms: ttl_remaining.as_millis() as u64,
        }
    }
}

/// Response body for `PUT /tiers/:tier/entries`
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    pub fn new(tier: &str, key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set in tier '{}'", key, tier),
            key,
        }
    }
}

/// Response body for `DELETE /tiers/:tier/entries/:key`
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub key: String,
}

impl DeleteResponse {
    pub fn new(tier: &str, key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' removed from tier '{}'", key, tier),
            key,
        }
    }
}

/// Response body for `GET /tiers/:tier/keys`
#[derive(Debug, Clone, Serialize)]
pub struct KeysResponse {
    pub tier: String,
    /// In-memory keys, oldest write first
    pub keys: Vec<String>,
}

/// Response body for the invalidation endpoints
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// What was matched: a pattern or a resource name
    pub target: String,
    /// Number of keys removed
    pub removed: usize,
}

/// Response body for the clear endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Tiers that were cleared
    pub cleared: Vec<String>,
}

/// Statistics for one tier
#[derive(Debug, Clone, Serialize)]
pub struct TierStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub total_entries: usize,
    pub max_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    pub persistent: bool,
}

impl TierStats {
    pub fn new(stats: &CacheStats, max_entries: usize, persistent: bool) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            max_entries,
            hit_rate: stats.hit_rate(),
            persistent,
        }
    }
}

/// Response body for `GET /stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub tiers: BTreeMap<String, TierStats>,
}

/// Response body for `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
