//! Live store tests against a running Redis instance.
//!
//! - Exercises the fred-backed adapter over a real connection: TTLs, exact
//!   deletes, and the cursor-driven pattern sweep.
//! - Marked `#[ignore]` so they only run where Redis is reachable; point them
//!   at a disposable database (the default is db 15 on localhost).
//! - Override the target with `VETRINA_TEST_REDIS_URL`.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use vetrina_cache::application::AppError;
use vetrina_cache::cache::{CacheConfig, CacheEngine, CacheKey, CacheStore, RedisStore};
use vetrina_cache::config::RedisSettings;
use vetrina_cache::domain::entities::FavoriteEntry;

type TestResult<T> = Result<T, Box<dyn std::error::Error>>;

fn test_settings() -> RedisSettings {
    let url = std::env::var("VETRINA_TEST_REDIS_URL")
        .unwrap_or_else(|_| "redis://127.0.0.1:6379/15".to_string());
    RedisSettings {
        url,
        pool_size: NonZeroU32::new(2).expect("pool size"),
        connect_timeout: Duration::from_secs(2),
        command_timeout: Duration::from_secs(2),
    }
}

async fn connect(scan_page_size: u32) -> TestResult<RedisStore> {
    let config = CacheConfig {
        scan_page_size,
        ..Default::default()
    };
    RedisStore::connect(&test_settings(), &config)
        .await
        .map_err(|err| {
            format!(
                "Failed to connect to {} ({err}). Start Redis before running this test.",
                test_settings().url
            )
            .into()
        })
}

fn unique_prefix() -> String {
    format!("livetest-{}", Uuid::new_v4().simple())
}

#[tokio::test]
#[ignore]
async fn live_round_trip_and_ttl_expiry() -> TestResult<()> {
    let store = connect(100).await?;
    let prefix = unique_prefix();
    let key = format!("{prefix}:item");

    store
        .set(&key, b"payload", Duration::from_millis(900))
        .await?;
    assert_eq!(store.get(&key).await?, Some(b"payload".to_vec()));

    tokio::time::sleep(Duration::from_millis(1_200)).await;
    assert_eq!(store.get(&key).await?, None, "entry should have expired");

    store.close().await?;
    Ok(())
}

#[tokio::test]
#[ignore]
async fn live_delete_of_absent_key_is_success() -> TestResult<()> {
    let store = connect(100).await?;
    let key = format!("{}:missing", unique_prefix());

    store.delete(&key).await?;

    store.close().await?;
    Ok(())
}

#[tokio::test]
#[ignore]
async fn live_pattern_sweep_spans_multiple_scan_pages() -> TestResult<()> {
    // A page size well below the key count forces several cursor rounds.
    let store = connect(25).await?;
    let prefix = unique_prefix();
    let ttl = Duration::from_secs(120);

    for index in 0..180 {
        store
            .set(&format!("{prefix}-list:{index}"), b"derived", ttl)
            .await?;
    }
    for index in 0..10 {
        store
            .set(&format!("{prefix}:single:{index}"), b"entity", ttl)
            .await?;
    }

    let removed = store.delete_pattern(&format!("{prefix}-*")).await?;
    assert_eq!(removed, 180, "every derived key should be swept");

    assert_eq!(store.get(&format!("{prefix}-list:0")).await?, None);
    assert_eq!(store.get(&format!("{prefix}-list:179")).await?, None);
    assert!(
        store.get(&format!("{prefix}:single:0")).await?.is_some(),
        "singular keys must survive the family sweep"
    );

    // Cleanup.
    store.delete_pattern(&format!("{prefix}*")).await?;
    store.close().await?;
    Ok(())
}

#[tokio::test]
#[ignore]
async fn live_engine_read_through_against_redis() -> TestResult<()> {
    let store = Arc::new(connect(100).await?);
    let engine = CacheEngine::new(store.clone(), &CacheConfig::default());

    // Favorites keys carry a fresh UUID, so this run cannot collide with
    // other tenants of the test database.
    let user_id = Uuid::new_v4();
    let entry = FavoriteEntry {
        item_id: Uuid::new_v4(),
        added_at: time::OffsetDateTime::UNIX_EPOCH,
    };

    let loaded = entry.clone();
    let first: Vec<FavoriteEntry> = engine
        .read_through(CacheKey::Favorites(user_id), || async move {
            Ok(Some(vec![loaded]))
        })
        .await?;
    assert_eq!(first, vec![entry.clone()]);

    // Second read must come from Redis; a loader hit would return the marker.
    let second: Vec<FavoriteEntry> = engine
        .read_through(CacheKey::Favorites(user_id), || async move {
            Err::<Option<Vec<FavoriteEntry>>, _>(
                vetrina_cache::application::repos::RepoError::Persistence(
                    "loader must not run on a warm key".to_string(),
                ),
            )
        })
        .await
        .map_err(|err: AppError| format!("expected warm read, got {err}"))?;
    assert_eq!(second, vec![entry]);

    // Cleanup.
    store.delete(&CacheKey::Favorites(user_id).render()).await?;
    store.close().await?;
    Ok(())
}
