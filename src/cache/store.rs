//! Cache port: the capability set the engine needs from a key/value store.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache transport error: {0}")]
    Transport(String),
    #[error("cache command timed out")]
    Timeout,
}

impl CacheError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Remote (or in-process) cache capabilities.
///
/// A miss is `Ok(None)`, distinguishable from a transport failure; the
/// engine collapses both into "miss" but adapters must keep the two apart so
/// failures can be logged for what they are.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch the raw bytes stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store `value` under `key` with the given expiry; silently overwrites.
    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError>;

    /// Remove a single entry. Deleting an absent key is success.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Remove every entry whose key matches `pattern` (`*` matches any byte
    /// sequence) and return how many were removed.
    ///
    /// Implementations scan the keyspace in pages and delete as they go; the
    /// pass is not atomic across the matched set, must tolerate concurrent
    /// inserts and deletes, and must not lock the whole keyspace.
    async fn delete_pattern(&self, pattern: &str) -> Result<u64, CacheError>;

    /// Release connections and background resources.
    async fn close(&self) -> Result<(), CacheError>;
}
