//! Cached favorites operations.
//!
//! Favorites have exactly one cached shape, the per-user list, so writes
//! evict that single key synchronously and never spawn a family eviction.

use std::sync::Arc;

use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::repos::FavoritesRepo;
use crate::cache::{CacheEngine, CacheKey};
use crate::domain::entities::FavoriteEntry;

#[derive(Clone)]
pub struct FavoriteService {
    engine: CacheEngine,
    favorites: Arc<dyn FavoritesRepo>,
}

impl FavoriteService {
    pub fn new(engine: CacheEngine, favorites: Arc<dyn FavoritesRepo>) -> Self {
        Self { engine, favorites }
    }

    pub async fn list_favorites(&self, user_id: Uuid) -> Result<Vec<FavoriteEntry>, AppError> {
        self.engine
            .read_through(CacheKey::Favorites(user_id), || async move {
                self.favorites.list_for_user(user_id).await.map(Some)
            })
            .await
    }

    /// Add an item to a user's favorites; already-exists when it is already
    /// on the list.
    pub async fn add_favorite(&self, user_id: Uuid, item_id: Uuid) -> Result<(), AppError> {
        self.engine
            .write_through(Some(CacheKey::Favorites(user_id)), None, || async move {
                self.favorites.add_favorite(user_id, item_id).await
            })
            .await
    }

    /// Remove an item from a user's favorites; not-found when it is not on
    /// the list.
    pub async fn remove_favorite(&self, user_id: Uuid, item_id: Uuid) -> Result<(), AppError> {
        self.engine
            .write_through(Some(CacheKey::Favorites(user_id)), None, || async move {
                self.favorites.remove_favorite(user_id, item_id).await
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use time::OffsetDateTime;

    use crate::application::repos::RepoError;
    use crate::cache::{CacheConfig, CacheStore, MemoryStore};

    use super::*;

    struct StubFavoritesRepo {
        entries: Mutex<Vec<(Uuid, Uuid)>>,
        lists: AtomicUsize,
    }

    impl StubFavoritesRepo {
        fn new() -> Self {
            Self {
                entries: Mutex::new(Vec::new()),
                lists: AtomicUsize::new(0),
            }
        }

        fn seeded(user_id: Uuid, item_id: Uuid) -> Self {
            let repo = Self::new();
            repo.entries.lock().unwrap().push((user_id, item_id));
            repo
        }
    }

    #[async_trait]
    impl FavoritesRepo for StubFavoritesRepo {
        async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<FavoriteEntry>, RepoError> {
            self.lists.fetch_add(1, Ordering::SeqCst);
            let entries = self.entries.lock().unwrap();
            Ok(entries
                .iter()
                .filter(|(user, _)| *user == user_id)
                .map(|(_, item)| FavoriteEntry {
                    item_id: *item,
                    added_at: OffsetDateTime::UNIX_EPOCH,
                })
                .collect())
        }

        async fn add_favorite(&self, user_id: Uuid, item_id: Uuid) -> Result<(), RepoError> {
            let mut entries = self.entries.lock().unwrap();
            if entries.contains(&(user_id, item_id)) {
                return Err(RepoError::duplicate("favorites_user_item_key"));
            }
            entries.push((user_id, item_id));
            Ok(())
        }

        async fn remove_favorite(&self, user_id: Uuid, item_id: Uuid) -> Result<(), RepoError> {
            let mut entries = self.entries.lock().unwrap();
            let before = entries.len();
            entries.retain(|entry| *entry != (user_id, item_id));
            if entries.len() == before {
                return Err(RepoError::NotFound);
            }
            Ok(())
        }
    }

    fn service_with(store: Arc<MemoryStore>, repo: Arc<StubFavoritesRepo>) -> FavoriteService {
        let engine = CacheEngine::new(store, &CacheConfig::default());
        FavoriteService::new(engine, repo)
    }

    #[tokio::test]
    async fn list_loads_once_then_serves_from_cache() {
        let user_id = Uuid::new_v4();
        let store = Arc::new(MemoryStore::new());
        let repo = Arc::new(StubFavoritesRepo::seeded(user_id, Uuid::new_v4()));
        let service = service_with(store.clone(), repo.clone());

        let first = service.list_favorites(user_id).await.unwrap();
        let second = service.list_favorites(user_id).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(repo.lists.load(Ordering::SeqCst), 1);
        assert!(
            store
                .get(&format!("favorite:{user_id}"))
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn add_evicts_the_user_list_and_nothing_else() {
        let user_id = Uuid::new_v4();
        let ttl = Duration::from_secs(60);
        let store = Arc::new(MemoryStore::new());
        store
            .set(&format!("favorite:{user_id}"), b"stale", ttl)
            .await
            .unwrap();
        store.set("items-list:1:10", b"kept", ttl).await.unwrap();
        let repo = Arc::new(StubFavoritesRepo::new());
        let service = service_with(store.clone(), repo);

        service.add_favorite(user_id, Uuid::new_v4()).await.unwrap();

        // The user's list is gone before the call returns; there is no
        // family pattern for favorites, so everything else survives.
        assert_eq!(
            store.get(&format!("favorite:{user_id}")).await.unwrap(),
            None
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(store.get("items-list:1:10").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn readd_maps_to_already_exists_and_keeps_cached_list() {
        let user_id = Uuid::new_v4();
        let item_id = Uuid::new_v4();
        let ttl = Duration::from_secs(60);
        let store = Arc::new(MemoryStore::new());
        store
            .set(&format!("favorite:{user_id}"), b"kept", ttl)
            .await
            .unwrap();
        let repo = Arc::new(StubFavoritesRepo::seeded(user_id, item_id));
        let service = service_with(store.clone(), repo);

        let result = service.add_favorite(user_id, item_id).await;

        assert!(matches!(result, Err(AppError::AlreadyExists(_))));
        assert!(
            store
                .get(&format!("favorite:{user_id}"))
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn remove_of_absent_entry_is_not_found_and_keeps_cached_list() {
        let user_id = Uuid::new_v4();
        let ttl = Duration::from_secs(60);
        let store = Arc::new(MemoryStore::new());
        store
            .set(&format!("favorite:{user_id}"), b"kept", ttl)
            .await
            .unwrap();
        let repo = Arc::new(StubFavoritesRepo::new());
        let service = service_with(store.clone(), repo);

        let result = service.remove_favorite(user_id, Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::NotFound)));
        assert!(
            store
                .get(&format!("favorite:{user_id}"))
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn remove_then_list_reflects_the_repository() {
        let user_id = Uuid::new_v4();
        let item_id = Uuid::new_v4();
        let store = Arc::new(MemoryStore::new());
        let repo = Arc::new(StubFavoritesRepo::seeded(user_id, item_id));
        let service = service_with(store.clone(), repo);

        let before = service.list_favorites(user_id).await.unwrap();
        assert_eq!(before.len(), 1);

        service.remove_favorite(user_id, item_id).await.unwrap();

        let after = service.list_favorites(user_id).await.unwrap();
        assert!(after.is_empty());
    }
}
