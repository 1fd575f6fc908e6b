//! Cached item operations.

use std::sync::Arc;

use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::repos::{
    CreateItemParams, FilterMap, ItemsRepo, Page, UpdateItemParams,
};
use crate::cache::{CacheEngine, CacheKey, KeyFamily};
use crate::domain::entities::ItemRecord;

#[derive(Clone)]
pub struct ItemService {
    engine: CacheEngine,
    items: Arc<dyn ItemsRepo>,
}

impl ItemService {
    pub fn new(engine: CacheEngine, items: Arc<dyn ItemsRepo>) -> Self {
        Self { engine, items }
    }

    pub async fn get_item(&self, id: Uuid) -> Result<ItemRecord, AppError> {
        self.engine
            .read_through(CacheKey::Item(id), || async move {
                self.items.find_by_id(id).await
            })
            .await
    }

    pub async fn list_items(&self, page: u32, size: u32) -> Result<Page<ItemRecord>, AppError> {
        self.engine
            .read_through(CacheKey::ItemsList { page, size }, || async move {
                self.items.list_items(page, size).await.map(Some)
            })
            .await
    }

    pub async fn search_items(
        &self,
        query: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<ItemRecord>, AppError> {
        self.engine
            .read_through(CacheKey::ItemsSearch { query, page, size }, || async move {
                self.items.search_items(query, page, size).await.map(Some)
            })
            .await
    }

    /// Items sharing the given item's parent; empty when it has none.
    pub async fn list_related(&self, id: Uuid) -> Result<Vec<ItemRecord>, AppError> {
        self.engine
            .read_through(CacheKey::ItemsRelated(id), || async move {
                self.items.list_related(id).await.map(Some)
            })
            .await
    }

    pub async fn list_by_label(
        &self,
        label: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<ItemRecord>, AppError> {
        self.engine
            .read_through(CacheKey::ItemsByLabel { label, page, size }, || async move {
                self.items.list_by_label(label, page, size).await.map(Some)
            })
            .await
    }

    pub async fn list_by_category(
        &self,
        slug: &str,
        page: u32,
        size: u32,
        filters: &FilterMap,
        sort: &str,
    ) -> Result<Page<ItemRecord>, AppError> {
        let key = CacheKey::ItemsByCategory {
            slug,
            page,
            size,
            filters,
            sort,
        };
        self.engine
            .read_through(key, || async move {
                self.items
                    .list_by_category(slug, page, size, filters, sort)
                    .await
                    .map(Some)
            })
            .await
    }

    pub async fn search_by_attributes(
        &self,
        query: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<ItemRecord>, AppError> {
        let key = CacheKey::ItemsAttrSearch { query, page, size };
        self.engine
            .read_through(key, || async move {
                self.items
                    .search_by_attributes(query, page, size)
                    .await
                    .map(Some)
            })
            .await
    }

    /// Create an item. There is no cached entry for an id that did not exist
    /// yet, so only the derived item entries are invalidated.
    pub async fn create_item(&self, params: CreateItemParams) -> Result<ItemRecord, AppError> {
        self.engine
            .write_through(None, Some(KeyFamily::Items), || async move {
                self.items.create_item(params).await
            })
            .await
    }

    pub async fn update_item(&self, params: UpdateItemParams) -> Result<ItemRecord, AppError> {
        let target = CacheKey::Item(params.id);
        self.engine
            .write_through(Some(target), Some(KeyFamily::Items), || async move {
                self.items.update_item(params).await
            })
            .await
    }

    pub async fn delete_item(&self, id: Uuid) -> Result<(), AppError> {
        self.engine
            .write_through(Some(CacheKey::Item(id)), Some(KeyFamily::Items), || {
                async move { self.items.delete_item(id).await }
            })
            .await
    }
}
