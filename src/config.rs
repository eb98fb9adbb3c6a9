//! Configuration Module
//!
//! Handles loading cache tier policies and server settings from environment
//! variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Policy for one cache tier.
#[derive(Debug, Clone, PartialEq)]
pub struct TierConfig {
    /// Maximum number of in-memory entries
    pub max_entries: usize,
    /// TTL for writes that do not name one
    pub default_ttl: Duration,
    /// Whether entries are written through to durable storage
    pub persistent: bool,
}

/// Server and cache configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Directory for the durable storage document, None = process-local storage
    pub storage_dir: Option<PathBuf>,
    /// Frequently-changing list data
    pub api: TierConfig,
    /// Rarely-changing reference data
    pub reference: TierConfig,
    /// Per-user data that should survive a restart
    pub session: TierConfig,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `STORAGE_DIR` - Durable storage directory (default: unset)
    /// - `API_CACHE_TTL_SECS` / `API_CACHE_MAX_ENTRIES` (default: 300 / 100)
    /// - `REFERENCE_CACHE_TTL_SECS` / `REFERENCE_CACHE_MAX_ENTRIES` (default: 1800 / 50)
    /// - `SESSION_CACHE_TTL_SECS` / `SESSION_CACHE_MAX_ENTRIES` (default: 3600 / 50)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            storage_dir: env::var("STORAGE_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            api: tier_from_env("API_CACHE", defaults.api),
            reference: tier_from_env("REFERENCE_CACHE", defaults.reference),
            session: tier_from_env("SESSION_CACHE", defaults.session),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            storage_dir: None,
            api: TierConfig {
                max_entries: 100,
                default_ttl: Duration::from_secs(5 * 60),
                persistent: false,
            },
            reference: TierConfig {
                max_entries: 50,
                default_ttl: Duration::from_secs(30 * 60),
                persistent: false,
            },
            session: TierConfig {
                max_entries: 50,
                default_ttl: Duration::from_secs(60 * 60),
                persistent: true,
            },
        }
    }
}

fn tier_from_env(prefix: &str, defaults: TierConfig) -> TierConfig {
    TierConfig {
        max_entries: env_or(&format!("{}_MAX_ENTRIES", prefix), defaults.max_entries),
        default_ttl: Duration::from_secs(env_or(
            &format!("{}_TTL_SECS", prefix),
            defaults.default_ttl.as_secs(),
        )),
        persistent: defaults.persistent,
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
