//! Invalidation Strategies
//!
//! Helpers that mutation paths call after a create/update/delete so the
//! read caches stop serving stale data. They hold no state of their own.

use tracing::info;

use crate::cache::SharedCache;
use crate::keys::Resource;
use crate::registry::CacheRegistry;

/// Deletes a single known key.
pub async fn invalidate_key(cache: &SharedCache, key: &str) {
    cache.write().await.delete(key);
}

/// Deletes every key containing `pattern`. Returns how many were removed.
pub async fn invalidate_pattern(cache: &SharedCache, pattern: &str) -> usize {
    cache.write().await.delete_matching(pattern)
}

/// Clears every given cache.
pub async fn invalidate_all<'a>(caches: impl IntoIterator<Item = &'a SharedCache>) {
    for cache in caches {
        cache.write().await.clear();
    }
}

/// Busts every cached view of `resource` and of the resources derived from
/// it. Returns how many keys were removed across all tiers.
pub async fn invalidate_resource(registry: &CacheRegistry, resource: Resource) -> usize {
    let mut removed = 0;
    for affected in std::iter::once(resource).chain(resource.dependents().iter().copied()) {
        removed += invalidate_pattern(registry.tier(affected.tier()), affected.endpoint()).await;
    }
    info!("Invalidated {} cached entries after {} changed", removed, resource);
    removed
}

/// Drops everything cached for the signed-in user.
pub async fn on_logout(registry: &CacheRegistry) {
    let caches: Vec<&SharedCache> = registry.iter().map(|(_, cache)| cache).collect();
    invalidate_all(caches).await;
    info!("All cache tiers cleared on logout");
}
