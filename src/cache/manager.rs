//! Cache Manager Module
//!
//! Main cache engine: a HashMap of time-stamped entries with insertion-order
//! eviction, lazy TTL expiry and optional write-through to durable storage.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheStats, InsertionOrder, SharedCache};
use crate::clock::{Clock, SystemClock};
use crate::error::StorageError;
use crate::storage::DurableStore;

// == Persistence ==
/// Durable backing for one cache instance.
#[derive(Debug, Clone)]
struct Persistence {
    store: Arc<dyn DurableStore>,
    /// Prepended to every cache key to form its storage key
    prefix: String,
}

impl Persistence {
    fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

// == Cache Manager ==
/// One cache instance with a fixed policy.
///
/// No operation fails: storage problems are logged and the in-memory side
/// carries on as if durable storage were not configured.
#[derive(Debug)]
pub struct CacheManager {
    /// Instance name, used in log output
    name: String,
    /// In-memory entries
    entries: HashMap<String, CacheEntry>,
    /// Write order for overflow eviction
    order: InsertionOrder,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of in-memory entries
    max_entries: usize,
    /// TTL in milliseconds for writes that do not name one
    default_ttl_ms: u64,
    persistence: Option<Persistence>,
    clock: Arc<dyn Clock>,
}

impl CacheManager {
    // == Constructor ==
    /// Creates a memory-only cache on the system clock.
    ///
    /// A `max_entries` of zero is raised to one.
    pub fn new(name: impl Into<String>, max_entries: usize, default_ttl: Duration) -> Self {
        Self {
            name: name.into(),
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            stats: CacheStats::new(),
            max_entries: max_entries.max(1),
            default_ttl_ms: duration_ms(default_ttl),
            persistence: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Backs the cache with `store`, storing each entry under `prefix + key`.
    pub fn with_storage(mut self, store: Arc<dyn DurableStore>, prefix: impl Into<String>) -> Self {
        self.persistence = Some(Persistence {
            store,
            prefix: prefix.into(),
        });
        self
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Wraps the cache for sharing across the application.
    pub fn into_shared(self) -> SharedCache {
        Arc::new(RwLock::new(self))
    }

    // == Set ==
    /// Stores `data` under `key`, replacing any previous entry.
    ///
    /// Uses the instance default when `ttl` is None. Writing a new key into a
    /// full cache first evicts the oldest-written entry from memory.
    pub fn set(&mut self, key: impl Into<String>, data: Value, ttl: Option<Duration>) {
        let ttl_ms = ttl.map(duration_ms).unwrap_or(self.default_ttl_ms);
        let entry = CacheEntry::new(key, data, self.clock.now_ms(), ttl_ms);

        self.persist(&entry);
        self.insert(entry);
    }

    /// Serializes `value` and stores it. A value that cannot be represented
    /// as JSON is logged and not stored.
    pub fn set_as<T: Serialize + ?Sized>(
        &mut self,
        key: impl Into<String>,
        value: &T,
        ttl: Option<Duration>,
    ) {
        let key = key.into();
        match serde_json::to_value(value) {
            Ok(data) => self.set(key, data, ttl),
            Err(err) => warn!(cache = %self.name, %key, error = %err, "Value not cacheable"),
        }
    }

    // == Get ==
    /// Returns the data for `key` if a valid entry exists.
    ///
    /// A key missing from memory is looked up in durable storage and, when
    /// still valid, pulled back into memory. Expired entries are deleted
    /// everywhere.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let now = self.clock.now_ms();

        if !self.entries.contains_key(key) {
            match self.load_persisted(key) {
                Some(entry) if entry.is_valid_at(now) => self.insert(entry),
                // Expired records never take a slot from a live entry
                Some(_) => return self.expire(key),
                None => {}
            }
        }

        let valid = match self.entries.get(key) {
            Some(entry) => entry.is_valid_at(now),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if !valid {
            return self.expire(key);
        }

        self.stats.record_hit();
        self.entries.get(key).map(|entry| entry.data.clone())
    }

    /// Typed variant of [`get`](Self::get). Data that does not deserialize
    /// into `T` reads as a miss.
    pub fn get_as<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let data = self.get(key)?;
        match serde_json::from_value(data) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(cache = %self.name, %key, error = %err, "Cached data has unexpected shape");
                None
            }
        }
    }

    // == Has ==
    /// True when `get` would return data. Counts as a read.
    pub fn has(&mut self, key: &str) -> bool {
        self.get(key).is_some()
    }

    // == Delete ==
    /// Removes `key` from memory and durable storage. Absent keys are ignored.
    pub fn delete(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.order.remove(key);
            self.stats.set_total_entries(self.entries.len());
        }

        if let Some(persistence) = &self.persistence {
            if let Err(err) = persistence.store.remove_item(&persistence.storage_key(key)) {
                warn!(cache = %self.name, %key, error = %err, "Failed to remove persisted entry");
            }
        }
    }

    // == Delete Matching ==
    /// Removes every key containing `pattern`, in memory and in durable
    /// storage. Returns how many distinct keys were removed.
    pub fn delete_matching(&mut self, pattern: &str) -> usize {
        let mut matched: BTreeSet<String> = self
            .entries
            .keys()
            .filter(|key| key.contains(pattern))
            .cloned()
            .collect();

        if let Some(persistence) = &self.persistence {
            match persistence.store.keys() {
                Ok(storage_keys) => matched.extend(
                    storage_keys
                        .iter()
                        .filter_map(|k| k.strip_prefix(persistence.prefix.as_str()))
                        .filter(|key| key.contains(pattern))
                        .map(str::to_string),
                ),
                Err(err) => {
                    warn!(cache = %self.name, %pattern, error = %err, "Failed to list persisted entries")
                }
            }
        }

        for key in &matched {
            self.delete(key);
        }
        matched.len()
    }

    // == Clear ==
    /// Empties the cache. In durable storage only records carrying this
    /// cache's prefix are removed.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.stats.set_total_entries(0);

        if let Some(persistence) = &self.persistence {
            let storage_keys = match persistence.store.keys() {
                Ok(keys) => keys,
                Err(err) => {
                    warn!(cache = %self.name, error = %err, "Failed to list persisted entries");
                    return;
                }
            };

            for storage_key in storage_keys
                .iter()
                .filter(|k| k.starts_with(persistence.prefix.as_str()))
            {
                if let Err(err) = persistence.store.remove_item(storage_key) {
                    warn!(cache = %self.name, %storage_key, error = %err, "Failed to remove persisted entry");
                }
            }
        }
    }

    // == Time To Live ==
    /// Remaining lifetime of an in-memory entry; zero once expired.
    ///
    /// Does not consult durable storage or count as a read.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        let now = self.clock.now_ms();
        self.entries
            .get(key)
            .map(|entry| Duration::from_millis(entry.ttl_remaining_ms(now)))
    }

    // == Keys ==
    /// Snapshot of in-memory keys, oldest write first.
    pub fn keys(&self) -> Vec<String> {
        self.order.iter().cloned().collect()
    }

    // == Length ==
    /// Number of entries held in memory, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are held in memory.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Stats ==
    /// Snapshot of the counters with the current entry count.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Instance name as shown in logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when entries are written through to durable storage.
    pub fn is_persistent(&self) -> bool {
        self.persistence.is_some()
    }

    /// Capacity of the in-memory map.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// TTL applied to writes that do not name one.
    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }

    // == Internals ==
    /// Deletes an expired `key` everywhere and records the read as a miss.
    fn expire(&mut self, key: &str) -> Option<Value> {
        self.delete(key);
        self.stats.record_expiration();
        self.stats.record_miss();
        debug!(cache = %self.name, %key, "Entry expired");
        None
    }

    fn insert(&mut self, entry: CacheEntry) {
        if !self.entries.contains_key(&entry.key) && self.entries.len() >= self.max_entries {
            if let Some(oldest) = self.order.pop_oldest() {
                self.entries.remove(&oldest);
                self.stats.record_eviction();
                debug!(cache = %self.name, key = %oldest, "Evicted oldest entry");
            }
        }

        self.order.record_write(&entry.key);
        self.entries.insert(entry.key.clone(), entry);
        self.stats.set_total_entries(self.entries.len());
    }

    fn persist(&self, entry: &CacheEntry) {
        let Some(persistence) = &self.persistence else {
            return;
        };

        let result = serde_json::to_string(entry)
            .map_err(StorageError::from)
            .and_then(|record| {
                persistence
                    .store
                    .set_item(&persistence.storage_key(&entry.key), &record)
            });

        if let Err(err) = result {
            warn!(cache = %self.name, key = %entry.key, error = %err, "Failed to persist entry");
        }
    }

    fn load_persisted(&self, key: &str) -> Option<CacheEntry> {
        let persistence = self.persistence.as_ref()?;

        let record = match persistence.store.get_item(&persistence.storage_key(key)) {
            Ok(record) => record?,
            Err(err) => {
                warn!(cache = %self.name, %key, error = %err, "Failed to read persisted entry");
                return None;
            }
        };

        match serde_json::from_str::<CacheEntry>(&record) {
            Ok(entry) if entry.key == key => Some(entry),
            Ok(entry) => {
                warn!(cache = %self.name, %key, stored_key = %entry.key, "Persisted entry belongs to another key");
                None
            }
            Err(err) => {
                warn!(cache = %self.name, %key, error = %err, "Persisted entry is corrupt");
                None
            }
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
