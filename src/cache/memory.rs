//! In-process cache adapter.
//!
//! Backs the test suite and single-process deployments that do not want a
//! network hop. Entries expire lazily: an expired entry is dropped on the
//! read that discovers it.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use super::store::{CacheError, CacheStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, Entry>,
}

#[derive(Debug)]
struct Entry {
    value: Vec<u8>,
    expires_at: Instant,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                return Ok(Some(entry.value.clone()));
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_vec(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.remove(key);
        Ok(())
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        let matching: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| glob_match(pattern, entry.key()))
            .map(|entry| entry.key().clone())
            .collect();

        let mut removed = 0;
        for key in matching {
            if self.entries.remove(&key).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn close(&self) -> Result<(), CacheError> {
        Ok(())
    }
}

/// Glob matching restricted to `*` wildcards, the only shape the key
/// families use. A pattern without `*` must match exactly.
fn glob_match(pattern: &str, key: &str) -> bool {
    let Some((first, rest)) = pattern.split_once('*') else {
        return pattern == key;
    };
    if !key.starts_with(first) {
        return false;
    }

    let mut pos = first.len();
    let mut remaining = rest;
    loop {
        match remaining.split_once('*') {
            Some((segment, rest)) => {
                if !segment.is_empty() {
                    match key[pos..].find(segment) {
                        Some(found) => pos += found + segment.len(),
                        None => return false,
                    }
                }
                remaining = rest;
            }
            None => {
                // Final segment is anchored at the end of the key.
                return remaining.is_empty()
                    || (key.len() >= pos + remaining.len() && key[pos..].ends_with(remaining));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::cache::keys::KeyFamily;

    use super::*;

    #[tokio::test]
    async fn set_then_get_returns_value() {
        let store = MemoryStore::new();
        store
            .set("item:1", b"payload", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(
            store.get("item:1").await.unwrap(),
            Some(b"payload".to_vec())
        );
    }

    #[tokio::test]
    async fn expired_entry_reads_as_miss() {
        let store = MemoryStore::new();
        store
            .set("item:1", b"payload", Duration::from_millis(5))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(25)).await;
        assert_eq!(store.get("item:1").await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn delete_of_absent_key_is_ok() {
        let store = MemoryStore::new();
        assert!(store.delete("item:missing").await.is_ok());
    }

    #[tokio::test]
    async fn delete_pattern_removes_only_matching_entries() {
        let store = MemoryStore::new();
        let ttl = Duration::from_secs(60);
        store.set("items-list:1:10", b"a", ttl).await.unwrap();
        store.set("items-search:q:1:10", b"b", ttl).await.unwrap();
        store.set("categories-list:1:10", b"c", ttl).await.unwrap();

        let removed = store.delete_pattern("items-*").await.unwrap();

        assert_eq!(removed, 2);
        assert_eq!(store.get("items-list:1:10").await.unwrap(), None);
        assert_eq!(store.get("items-search:q:1:10").await.unwrap(), None);
        assert!(store.get("categories-list:1:10").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn family_patterns_spare_single_entity_keys() {
        let store = MemoryStore::new();
        let ttl = Duration::from_secs(60);
        store.set("item:abc", b"a", ttl).await.unwrap();
        store.set("category:tools", b"b", ttl).await.unwrap();
        store.set("promo:sale", b"c", ttl).await.unwrap();
        store.set("order:42", b"d", ttl).await.unwrap();
        store.set("items-list:1:10", b"e", ttl).await.unwrap();

        for family in [
            KeyFamily::Items,
            KeyFamily::Categories,
            KeyFamily::Promos,
            KeyFamily::Orders,
        ] {
            store.delete_pattern(family.pattern()).await.unwrap();
        }

        assert!(store.get("item:abc").await.unwrap().is_some());
        assert!(store.get("category:tools").await.unwrap().is_some());
        assert!(store.get("promo:sale").await.unwrap().is_some());
        assert!(store.get("order:42").await.unwrap().is_some());
        assert_eq!(store.get("items-list:1:10").await.unwrap(), None);
    }

    #[test]
    fn glob_without_wildcard_requires_exact_match() {
        assert!(glob_match("item:1", "item:1"));
        assert!(!glob_match("item:1", "item:12"));
        assert!(!glob_match("item:1", "item"));
    }

    #[test]
    fn glob_prefix_suffix_and_middle() {
        assert!(glob_match("items-*", "items-list:1:10"));
        assert!(!glob_match("items-*", "item:1"));
        assert!(glob_match("*:1:10", "items-list:1:10"));
        assert!(!glob_match("*:1:10", "items-list:1:20"));
        assert!(glob_match("items-*:1:*", "items-search:q:1:10"));
        assert!(glob_match("a*b*c", "aXXbYYc"));
        assert!(!glob_match("a*b*c", "aXXcYYb"));
    }
}
