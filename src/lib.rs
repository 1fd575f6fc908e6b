//! Read-through caching and coordinated invalidation for the Vetrina
//! catalog services.
//!
//! The crate sits between transport handlers and the durable repositories:
//! reads consult the cache first and populate it on a miss, writes go to the
//! repository and then evict the affected cache entries. Eviction is
//! two-pronged: the entity's canonical key is deleted synchronously, and the
//! family of derived (list/search) entries is wiped by a detached background
//! pattern delete so request latency never depends on scanning the keyspace.
//!
//! ```rust,ignore
//! let settings = vetrina_cache::config::load()?;
//! vetrina_cache::telemetry::init(&settings.logging)?;
//!
//! let cache_config = CacheConfig::from(&settings.cache);
//! let store = Arc::new(RedisStore::connect(&settings.redis, &cache_config).await?);
//! let engine = CacheEngine::new(store, &cache_config);
//! let items = ItemService::new(engine.clone(), items_repo);
//!
//! let item = items.get_item(id).await?;
//! ```
//!
//! Repository implementations (SQL, RPC) and the HTTP surface live in the
//! embedding service; this crate only consumes their traits.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod telemetry;
