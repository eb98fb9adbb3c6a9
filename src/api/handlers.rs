//! API Handlers
//!
//! HTTP request handlers for each cache endpoint.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::cache::SharedCache;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::invalidation::{invalidate_all, invalidate_pattern, invalidate_resource};
use crate::keys::Resource;
use crate::models::{
    ClearResponse, DeleteResponse, GetResponse, HealthResponse, InvalidateRequest,
    InvalidateResponse, KeysResponse, SetRequest, SetResponse, StatsResponse, TierStats,
};
use crate::registry::{CacheRegistry, CacheTier};

/// Application state shared across all handlers.
///
/// Holds the cache registry; each tier is its own `Arc<RwLock<_>>`, so
/// handlers working on different tiers never contend.
#[derive(Clone)]
pub struct AppState {
    pub registry: CacheRegistry,
}

impl AppState {
    pub fn new(registry: CacheRegistry) -> Self {
        Self { registry }
    }

    /// Builds every cache tier from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(CacheRegistry::from_config(config))
    }
}

/// Handler for PUT /tiers/:tier/entries
pub async fn set_handler(
    State(state): State<AppState>,
    Path(tier): Path<String>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    let tier: CacheTier = tier.parse()?;
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl();
    let mut cache = state.registry.tier(tier).write().await;
    cache.set(req.key.clone(), req.value, ttl);

    Ok(Json(SetResponse::new(tier.as_str(), req.key)))
}

/// Handler for GET /tiers/:tier/entries/:key
///
/// Absent and expired keys are both 404.
pub async fn get_handler(
    State(state): State<AppState>,
    Path((tier, key)): Path<(String, String)>,
) -> Result<Json<GetResponse>> {
    let tier: CacheTier = tier.parse()?;

    // Write lock: a read may expire the entry or load it from storage
    let mut cache = state.registry.tier(tier).write().await;
    let value = cache
        .get(&key)
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;
    let ttl_remaining = cache.ttl_remaining(&key).unwrap_or_default();

    Ok(Json(GetResponse::new(tier.as_str(), key, value, ttl_remaining)))
}

/// Handler for DELETE /tiers/:tier/entries/:key
///
/// Idempotent: deleting an absent key succeeds.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path((tier, key)): Path<(String, String)>,
) -> Result<Json<DeleteResponse>> {
    let tier: CacheTier = tier.parse()?;
    state.registry.tier(tier).write().await.delete(&key);

    Ok(Json(DeleteResponse::new(tier.as_str(), key)))
}

/// Handler for GET /tiers/:tier/keys
pub async fn keys_handler(
    State(state): State<AppState>,
    Path(tier): Path<String>,
) -> Result<Json<KeysResponse>> {
    let tier: CacheTier = tier.parse()?;
    let keys = state.registry.tier(tier).read().await.keys();

    Ok(Json(KeysResponse {
        tier: tier.to_string(),
        keys,
    }))
}

/// Handler for POST /tiers/:tier/invalidate
pub async fn invalidate_pattern_handler(
    State(state): State<AppState>,
    Path(tier): Path<String>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<InvalidateResponse>> {
    let tier: CacheTier = tier.parse()?;
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let removed = invalidate_pattern(state.registry.tier(tier), &req.pattern).await;
    info!("Invalidated {} entries matching '{}' in tier '{}'", removed, req.pattern, tier);

    Ok(Json(InvalidateResponse {
        target: req.pattern,
        removed,
    }))
}

/// Handler for POST /resources/:resource/invalidate
///
/// Runs the resource's invalidation strategy after a backend mutation.
pub async fn invalidate_resource_handler(
    State(state): State<AppState>,
    Path(resource): Path<String>,
) -> Result<Json<InvalidateResponse>> {
    let resource: Resource = resource.parse()?;
    let removed = invalidate_resource(&state.registry, resource).await;

    Ok(Json(InvalidateResponse {
        target: resource.to_string(),
        removed,
    }))
}

/// Handler for DELETE /tiers/:tier
pub async fn clear_tier_handler(
    State(state): State<AppState>,
    Path(tier): Path<String>,
) -> Result<Json<ClearResponse>> {
    let tier: CacheTier = tier.parse()?;
    invalidate_all([state.registry.tier(tier)]).await;
    info!("Cleared tier '{}'", tier);

    Ok(Json(ClearResponse {
        cleared: vec![tier.to_string()],
    }))
}

/// Handler for DELETE /tiers
pub async fn clear_all_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let caches: Vec<&SharedCache> = state.registry.iter().map(|(_, cache)| cache).collect();
    invalidate_all(caches).await;
    info!("Cleared all tiers");

    Json(ClearResponse {
        cleared: CacheTier::ALL.iter().map(ToString::to_string).collect(),
    })
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let mut tiers = BTreeMap::new();
    for (tier, cache) in state.registry.iter() {
        let cache = cache.read().await;
        tiers.insert(
            tier.to_string(),
            TierStats::new(&cache.stats(), cache.max_entries(), cache.is_persistent()),
        );
    }

    Json(StatsResponse { tiers })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
