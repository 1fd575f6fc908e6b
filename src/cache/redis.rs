//! Redis cache adapter built on a fred connection pool.

use std::time::Duration;

use async_trait::async_trait;
use fred::clients::Pool;
use fred::error::ErrorKind;
use fred::prelude::*;
use fred::types::scan::ScanType;
use fred::types::{Builder, Expiration};

use crate::config::RedisSettings;

use super::config::CacheConfig;
use super::store::{CacheError, CacheStore};

/// Cursor value Redis uses to signal a completed SCAN pass.
const SCAN_DONE: &str = "0";

pub struct RedisStore {
    pool: Pool,
    scan_page_size: u32,
}

impl RedisStore {
    /// Build the pool, connect every client, and wait until all of them are
    /// ready. Reconnection after that point is handled by the policy.
    pub async fn connect(settings: &RedisSettings, config: &CacheConfig) -> Result<Self, CacheError> {
        let redis_config = Config::from_url(&settings.url).map_err(map_cache_error)?;

        let connect_timeout = settings.connect_timeout;
        let command_timeout = settings.command_timeout;
        let pool = Builder::from_config(redis_config)
            .with_connection_config(|cfg| {
                cfg.connection_timeout = connect_timeout;
                cfg.internal_command_timeout = command_timeout;
            })
            .set_policy(ReconnectPolicy::new_exponential(0, 100, 1_000, 2))
            .build_pool(settings.pool_size.get() as usize)
            .map_err(map_cache_error)?;

        pool.init().await.map_err(map_cache_error)?;
        pool.wait_for_connect().await.map_err(map_cache_error)?;

        Ok(Self {
            pool,
            scan_page_size: config.scan_page_size_clamped(),
        })
    }

    fn expiration(ttl: Duration) -> Expiration {
        if ttl < Duration::from_secs(1) {
            Expiration::PX(ttl.as_millis() as i64)
        } else {
            Expiration::EX(ttl.as_secs() as i64)
        }
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.pool.get(key).await.map_err(map_cache_error)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        self.pool
            .set::<(), _, _>(key, value.to_vec(), Some(Self::expiration(ttl)), None, false)
            .await
            .map_err(map_cache_error)
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.pool
            .del::<i64, _>(key)
            .await
            .map(|_| ())
            .map_err(map_cache_error)
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        let mut cursor = SCAN_DONE.to_string();
        let mut removed: u64 = 0;

        loop {
            let (next_cursor, keys): (String, Vec<String>) = self
                .pool
                .scan_page::<(String, Vec<String>), String, String>(
                    cursor,
                    pattern.to_string(),
                    Some(self.scan_page_size),
                    None::<ScanType>,
                )
                .await
                .map_err(map_cache_error)?;

            if !keys.is_empty() {
                let deleted: i64 = self.pool.del(keys).await.map_err(map_cache_error)?;
                removed += deleted.max(0) as u64;
            }

            if next_cursor == SCAN_DONE {
                break;
            }
            cursor = next_cursor;
        }

        Ok(removed)
    }

    async fn close(&self) -> Result<(), CacheError> {
        self.pool.quit().await.map_err(map_cache_error)
    }
}

fn map_cache_error(err: fred::error::Error) -> CacheError {
    match err.kind() {
        ErrorKind::Timeout => CacheError::Timeout,
        _ => CacheError::Transport(err.to_string()),
    }
}
