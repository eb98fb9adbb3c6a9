//! Durable Storage Module
//!
//! Synchronous key-value namespaces that cache entries can be persisted to
//! so they survive a restart.

mod file;
mod memory;

use std::fmt::Debug;

use crate::error::StorageError;

pub use file::FileStore;
pub use memory::MemoryStore;

// == Durable Store Trait ==
/// A flat string-to-string namespace shared by everything that writes to it.
///
/// Writers keep their records apart by key prefix, so implementations must
/// never touch keys other than the one named in a call.
pub trait DurableStore: Debug + Send + Sync {
    /// Returns the stored string, or `None` if the key is absent.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous record.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing an absent key succeeds.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Snapshot of every key in the namespace.
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}
