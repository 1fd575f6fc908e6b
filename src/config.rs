//! Configuration layer: typed settings with layered precedence (file → env).
//!
//! Settings are read from `config/default.*` and `vetrina.*` (both optional),
//! then overridden by environment variables prefixed with `VETRINA`. The
//! embedding service may also point at an explicit file via [`load_from`].

use std::{num::NonZeroU32, path::Path, str::FromStr, time::Duration};

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "vetrina";
const ENV_PREFIX: &str = "VETRINA";
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
const DEFAULT_REDIS_POOL_SIZE: u32 = 4;
const DEFAULT_REDIS_CONNECT_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_REDIS_COMMAND_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_CACHE_TTL_SECS: u64 = 600;
const DEFAULT_CACHE_SCAN_PAGE_SIZE: u32 = 250;

/// Fully-resolved deployment settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub redis: RedisSettings,
    pub cache: CacheSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct RedisSettings {
    pub url: String,
    pub pool_size: NonZeroU32,
    pub connect_timeout: Duration,
    pub command_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub ttl: Duration,
    pub scan_page_size: NonZeroU32,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment).
pub fn load() -> Result<Settings, LoadError> {
    load_inner(None)
}

/// Load settings with an additional required configuration file.
///
/// The explicit file is layered on top of the default sources and below the
/// environment, mirroring how deployment-specific overrides are shipped.
pub fn load_from(path: &Path) -> Result<Settings, LoadError> {
    load_inner(Some(path))
}

fn load_inner(explicit: Option<&Path>) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = explicit {
        builder = builder.add_source(File::from(path).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let raw: RawSettings = builder.build()?.try_deserialize()?;
    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    redis: RawRedisSettings,
    cache: RawCacheSettings,
    logging: RawLoggingSettings,
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            redis,
            cache,
            logging,
        } = raw;

        let redis = build_redis_settings(redis)?;
        let cache = build_cache_settings(cache)?;
        let logging = build_logging_settings(logging)?;

        Ok(Self {
            redis,
            cache,
            logging,
        })
    }
}

fn build_redis_settings(redis: RawRedisSettings) -> Result<RedisSettings, LoadError> {
    let url = match redis.url {
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(LoadError::invalid("redis.url", "url must not be empty"));
            }
            trimmed.to_string()
        }
        None => DEFAULT_REDIS_URL.to_string(),
    };

    let pool_value = redis.pool_size.unwrap_or(DEFAULT_REDIS_POOL_SIZE);
    let pool_size = non_zero_u32(pool_value.into(), "redis.pool_size")?;

    let connect_ms = redis
        .connect_timeout_ms
        .unwrap_or(DEFAULT_REDIS_CONNECT_TIMEOUT_MS);
    if connect_ms == 0 {
        return Err(LoadError::invalid(
            "redis.connect_timeout_ms",
            "must be greater than zero",
        ));
    }

    let command_ms = redis
        .command_timeout_ms
        .unwrap_or(DEFAULT_REDIS_COMMAND_TIMEOUT_MS);
    if command_ms == 0 {
        return Err(LoadError::invalid(
            "redis.command_timeout_ms",
            "must be greater than zero",
        ));
    }

    Ok(RedisSettings {
        url,
        pool_size,
        connect_timeout: Duration::from_millis(connect_ms),
        command_timeout: Duration::from_millis(command_ms),
    })
}

fn build_cache_settings(cache: RawCacheSettings) -> Result<CacheSettings, LoadError> {
    let ttl_seconds = cache.ttl_seconds.unwrap_or(DEFAULT_CACHE_TTL_SECS);
    if ttl_seconds == 0 {
        return Err(LoadError::invalid(
            "cache.ttl_seconds",
            "must be greater than zero",
        ));
    }

    let scan_value = cache.scan_page_size.unwrap_or(DEFAULT_CACHE_SCAN_PAGE_SIZE);
    let scan_page_size = non_zero_u32(scan_value.into(), "cache.scan_page_size")?;

    Ok(CacheSettings {
        ttl: Duration::from_secs(ttl_seconds),
        scan_page_size,
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawRedisSettings {
    url: Option<String>,
    pool_size: Option<u32>,
    connect_timeout_ms: Option<u64>,
    command_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCacheSettings {
    ttl_seconds: Option<u64>,
    scan_page_size: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

fn non_zero_u32(value: u64, key: &'static str) -> Result<NonZeroU32, LoadError> {
    if value == 0 {
        return Err(LoadError::invalid(key, "must be greater than zero"));
    }
    let value_u32: u32 = value
        .try_into()
        .map_err(|_| LoadError::invalid(key, "value exceeds supported range for u32"))?;
    NonZeroU32::new(value_u32).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}
