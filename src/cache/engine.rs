//! Read-through and write-invalidate orchestration.
//!
//! [`CacheEngine`] owns the two contracts every cached operation follows:
//!
//! - **Read-through**: try the cache, fall back to the repository on a miss,
//!   populate on success. Not-found results are never cached. Any cache
//!   failure counts as a miss and never surfaces to the caller.
//! - **Write-invalidate**: run the repository write first; on success evict
//!   the targeted key synchronously, then wipe the key family with a detached
//!   background pattern delete. The write's latency never depends on scanning
//!   the keyspace, and dropping the originating request does not abort the
//!   family eviction.
//!
//! The engine holds no per-request state; it is a cheap handle shared across
//! all request tasks.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use metrics::{counter, histogram};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::application::error::AppError;
use crate::application::repos::RepoError;

use super::codec;
use super::config::CacheConfig;
use super::keys::{CacheKey, KeyFamily};
use super::store::CacheStore;

const METRIC_CACHE_HIT_TOTAL: &str = "vetrina_cache_hit_total";
const METRIC_CACHE_MISS_TOTAL: &str = "vetrina_cache_miss_total";
const METRIC_CACHE_POPULATE_TOTAL: &str = "vetrina_cache_populate_total";
const METRIC_CACHE_EVICT_TOTAL: &str = "vetrina_cache_evict_total";
const METRIC_CACHE_FAMILY_EVICT_TOTAL: &str = "vetrina_cache_family_evict_total";
const METRIC_CACHE_PATTERN_SCAN_MS: &str = "vetrina_cache_pattern_scan_ms";

#[derive(Clone)]
pub struct CacheEngine {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl CacheEngine {
    pub fn new(store: Arc<dyn CacheStore>, config: &CacheConfig) -> Self {
        Self {
            store,
            ttl: config.ttl(),
        }
    }

    /// Serve a read through the cache.
    ///
    /// `load` runs at most once and performs the single repository call for
    /// this operation. `Ok(None)` and [`RepoError::NotFound`] both map to
    /// [`AppError::NotFound`] without touching the cache; other repository
    /// errors are translated and likewise leave the cache untouched. On a
    /// loaded value the entry is populated with the default time-to-live,
    /// and a populate failure is logged and suppressed.
    pub async fn read_through<T, F, Fut>(&self, key: CacheKey<'_>, load: F) -> Result<T, AppError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>, RepoError>>,
    {
        let key = key.render();

        if let Some(value) = self.lookup(&key).await {
            return Ok(value);
        }

        match load().await {
            Ok(Some(value)) => {
                self.populate(&key, &value).await;
                Ok(value)
            }
            Ok(None) | Err(RepoError::NotFound) => Err(AppError::NotFound),
            Err(err) => Err(err.into()),
        }
    }

    /// Run a repository write, then invalidate.
    ///
    /// On repository failure the error is translated and the cache is left
    /// untouched. On success the targeted key, when there is one, is deleted
    /// before returning; the family pattern, when there is one, is handed to
    /// a detached task that outlives this call. Eviction failures on either
    /// path are logged and suppressed.
    pub async fn write_through<T, F, Fut>(
        &self,
        target: Option<CacheKey<'_>>,
        family: Option<KeyFamily>,
        write: F,
    ) -> Result<T, AppError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, RepoError>>,
    {
        let value = write().await?;

        if let Some(key) = target {
            self.evict(&key.render()).await;
        }
        if let Some(family) = family {
            self.spawn_family_eviction(family);
        }

        Ok(value)
    }

    async fn lookup<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = match self.store.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                counter!(METRIC_CACHE_MISS_TOTAL).increment(1);
                debug!(key, "cache miss");
                return None;
            }
            Err(err) => {
                counter!(METRIC_CACHE_MISS_TOTAL).increment(1);
                warn!(key, error = %err, "cache read failed, treating as miss");
                return None;
            }
        };

        match codec::decode(&bytes) {
            Ok(value) => {
                counter!(METRIC_CACHE_HIT_TOTAL).increment(1);
                debug!(key, "cache hit");
                Some(value)
            }
            Err(err) => {
                // The corrupt entry is left in place; it will expire or be
                // overwritten by the populate that follows this miss.
                counter!(METRIC_CACHE_MISS_TOTAL).increment(1);
                warn!(key, error = %err, "cache entry failed to decode, treating as miss");
                None
            }
        }
    }

    async fn populate<T: Serialize>(&self, key: &str, value: &T) {
        let bytes = match codec::encode(value) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(key, error = %err, "cache encode failed, skipping populate");
                return;
            }
        };

        match self.store.set(key, &bytes, self.ttl).await {
            Ok(()) => {
                counter!(METRIC_CACHE_POPULATE_TOTAL).increment(1);
                debug!(key, "cache populated");
            }
            Err(err) => warn!(key, error = %err, "cache populate failed"),
        }
    }

    async fn evict(&self, key: &str) {
        match self.store.delete(key).await {
            Ok(()) => {
                counter!(METRIC_CACHE_EVICT_TOTAL).increment(1);
                debug!(key, "cache entry evicted");
            }
            Err(err) => warn!(key, error = %err, "cache evict failed"),
        }
    }

    fn spawn_family_eviction(&self, family: KeyFamily) {
        let store = Arc::clone(&self.store);
        let pattern = family.pattern();
        tokio::spawn(async move {
            let start = Instant::now();
            match store.delete_pattern(pattern).await {
                Ok(removed) => {
                    counter!(METRIC_CACHE_FAMILY_EVICT_TOTAL).increment(1);
                    histogram!(METRIC_CACHE_PATTERN_SCAN_MS)
                        .record(start.elapsed().as_millis() as f64);
                    debug!(pattern, removed, "family eviction complete");
                }
                Err(err) => warn!(pattern, error = %err, "family eviction failed"),
            }
        });
    }
}
