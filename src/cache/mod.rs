//! Vetrina Cache Layer
//!
//! Read-through caching with coordinated invalidation for catalog data:
//!
//! - **Keys**: every cacheable operation renders a deterministic key; derived
//!   (list/search) entries share a family prefix so they can be wiped with a
//!   single pattern delete
//! - **Engine**: `read_through` / `write_through` wrap repository calls with
//!   the lookup-populate and write-evict protocols
//! - **Stores**: a Redis adapter for production and an in-process store for
//!   tests
//!
//! ## Configuration
//!
//! Cache behavior is controlled via `vetrina.toml`:
//!
//! ```toml
//! [cache]
//! ttl_seconds = 600
//! scan_page_size = 250
//! ```

mod codec;
mod config;
mod engine;
mod keys;
mod memory;
mod redis;
mod store;

pub use codec::{CodecError, decode, encode};
pub use config::CacheConfig;
pub use engine::CacheEngine;
pub use keys::{CacheKey, KeyFamily};
pub use memory::MemoryStore;
pub use redis::RedisStore;
pub use store::{CacheError, CacheStore};
