//! Cache Registry Module
//!
//! Builds one cache instance per tier at start-up and hands them out by
//! reference. Nothing in the crate keeps a cache in global state.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{info, warn};

use crate::cache::{CacheManager, SharedCache, DEFAULT_STORAGE_PREFIX};
use crate::clock::{Clock, SystemClock};
use crate::config::{Config, TierConfig};
use crate::error::CacheError;
use crate::storage::{DurableStore, FileStore, MemoryStore};

/// File name of the durable storage document inside `STORAGE_DIR`
pub const STORAGE_FILE_NAME: &str = "storage.json";

// == Cache Tier ==
/// Named cache instances with their own policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTier {
    /// Short-lived list and detail responses
    Api,
    /// Long-lived, rarely-changing data
    Reference,
    /// Durable per-user data
    Session,
}

impl CacheTier {
    pub const ALL: [CacheTier; 3] = [CacheTier::Api, CacheTier::Reference, CacheTier::Session];

    pub fn as_str(self) -> &'static str {
        match self {
            CacheTier::Api => "api",
            CacheTier::Reference => "reference",
            CacheTier::Session => "session",
        }
    }

    /// Durable storage prefix for this tier, e.g. `cache_session_`.
    pub fn storage_prefix(self) -> String {
        format!("{}{}_", DEFAULT_STORAGE_PREFIX, self.as_str())
    }
}

impl fmt::Display for CacheTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheTier {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CacheTier::ALL
            .into_iter()
            .find(|tier| tier.as_str() == s)
            .ok_or_else(|| CacheError::UnknownTier(s.to_string()))
    }
}

// == Cache Registry ==
/// The application's cache instances, one per tier.
#[derive(Debug, Clone)]
pub struct CacheRegistry {
    api: SharedCache,
    reference: SharedCache,
    session: SharedCache,
}

impl CacheRegistry {
    /// Assembles a registry from already-built caches.
    pub fn new(api: SharedCache, reference: SharedCache, session: SharedCache) -> Self {
        Self {
            api,
            reference,
            session,
        }
    }

    /// Builds every tier from configuration on the system clock.
    pub fn from_config(config: &Config) -> Self {
        Self::from_config_with_clock(config, Arc::new(SystemClock))
    }

    /// Builds every tier from configuration on the given clock.
    ///
    /// Persistent tiers share one store, a file under `storage_dir` when set
    /// and usable, otherwise process-local memory. Each tier keeps its records
    /// under its own prefix (see [`CacheTier::storage_prefix`]).
    pub fn from_config_with_clock(config: &Config, clock: Arc<dyn Clock>) -> Self {
        let store = open_store(config);
        let build = |tier: CacheTier, policy: &TierConfig| {
            let mut cache = CacheManager::new(tier.as_str(), policy.max_entries, policy.default_ttl)
                .with_clock(clock.clone());
            if policy.persistent {
                cache = cache.with_storage(store.clone(), tier.storage_prefix());
            }
            info!(
                "Cache tier '{}' ready: max_entries={}, default_ttl={}s, persistent={}",
                tier,
                policy.max_entries,
                policy.default_ttl.as_secs(),
                policy.persistent
            );
            cache.into_shared()
        };

        Self {
            api: build(CacheTier::Api, &config.api),
            reference: build(CacheTier::Reference, &config.reference),
            session: build(CacheTier::Session, &config.session),
        }
    }

    /// The cache backing `tier`.
    pub fn tier(&self, tier: CacheTier) -> &SharedCache {
        match tier {
            CacheTier::Api => &self.api,
            CacheTier::Reference => &self.reference,
            CacheTier::Session => &self.session,
        }
    }

    /// Every tier with its cache, in `CacheTier::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (CacheTier, &SharedCache)> {
        CacheTier::ALL.into_iter().map(move |tier| (tier, self.tier(tier)))
    }
}

fn open_store(config: &Config) -> Arc<dyn DurableStore> {
    if let Some(dir) = &config.storage_dir {
        match FileStore::open(dir.join(STORAGE_FILE_NAME)) {
            Ok(store) => {
                info!("Durable cache storage at {}", store.path().display());
                return Arc::new(store);
            }
            Err(err) => warn!(
                "Durable storage under {} unusable, falling back to memory: {}",
                dir.display(),
                err
            ),
        }
    }
    Arc::new(MemoryStore::new())
}
