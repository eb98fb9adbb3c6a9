//! Cache-Wrapped Calls
//!
//! Fetch-or-cache in one call: a hit short-circuits the fetch, a successful
//! fetch populates the cache.

use std::future::Future;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::cache::SharedCache;

/// Returns the cached value for `key`, or runs `fetch` and caches its result.
///
/// - On a hit `fetch` is never called.
/// - On a miss the result of `fetch` is stored under `key` with `ttl` (the
///   cache's default when None) and returned.
/// - A failed fetch is returned as-is and the cache is left untouched.
///
/// The cache lock is released while `fetch` runs. Concurrent misses on the
/// same key are not merged: each one fetches, and the last to finish wins.
/// Retries and timeouts belong to `fetch`.
pub async fn cached_call<T, E, F, Fut>(
    cache: &SharedCache,
    key: &str,
    ttl: Option<Duration>,
    fetch: F,
) -> Result<T, E>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let cached = cache.write().await.get_as::<T>(key);
    if let Some(value) = cached {
        debug!(%key, "Cache hit");
        return Ok(value);
    }

    debug!(%key, "Cache miss, fetching");
    let value = fetch().await?;
    cache.write().await.set_as(key, &value, ttl);
    Ok(value)
}
