//! Cache layer configuration.

use std::time::Duration;

use serde::Deserialize;

// Default values for cache configuration
const DEFAULT_TTL_SECONDS: u64 = 600;
const DEFAULT_SCAN_PAGE_SIZE: u32 = 250;

/// Tuning knobs for the cache layer, typically sourced from `vetrina.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Time-to-live applied to every populated entry, in seconds.
    pub ttl_seconds: u64,
    /// Keys fetched per SCAN page during pattern eviction.
    pub scan_page_size: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_TTL_SECONDS,
            scan_page_size: DEFAULT_SCAN_PAGE_SIZE,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            ttl_seconds: settings.ttl.as_secs(),
            scan_page_size: settings.scan_page_size.get(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    /// Returns the scan page size, clamping to 1 if zero.
    pub fn scan_page_size_clamped(&self) -> u32 {
        self.scan_page_size.max(1)
    }
}
