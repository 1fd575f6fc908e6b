//! Cached category operations.

use std::sync::Arc;

use crate::application::error::AppError;
use crate::application::repos::{
    CategoriesRepo, CreateCategoryParams, Page, UpdateCategoryParams,
};
use crate::cache::{CacheEngine, CacheKey, KeyFamily};
use crate::domain::entities::{CategoryFilterRecord, CategoryRecord};

#[derive(Clone)]
pub struct CategoryService {
    engine: CacheEngine,
    categories: Arc<dyn CategoriesRepo>,
}

impl CategoryService {
    pub fn new(engine: CacheEngine, categories: Arc<dyn CategoriesRepo>) -> Self {
        Self { engine, categories }
    }

    pub async fn get_category(&self, slug: &str) -> Result<CategoryRecord, AppError> {
        self.engine
            .read_through(CacheKey::Category(slug), || async move {
                self.categories.find_by_slug(slug).await
            })
            .await
    }

    pub async fn list_categories(
        &self,
        page: u32,
        size: u32,
    ) -> Result<Page<CategoryRecord>, AppError> {
        self.engine
            .read_through(CacheKey::CategoriesList { page, size }, || async move {
                self.categories.list_categories(page, size).await.map(Some)
            })
            .await
    }

    pub async fn search_categories(
        &self,
        query: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<CategoryRecord>, AppError> {
        let key = CacheKey::CategoriesSearch { query, page, size };
        self.engine
            .read_through(key, || async move {
                self.categories
                    .search_categories(query, page, size)
                    .await
                    .map(Some)
            })
            .await
    }

    /// Filter definitions attached to one category; not-found when the
    /// category itself does not exist.
    pub async fn list_filters(&self, slug: &str) -> Result<Vec<CategoryFilterRecord>, AppError> {
        self.engine
            .read_through(CacheKey::CategoryFilters(slug), || async move {
                self.categories.list_filters(slug).await.map(Some)
            })
            .await
    }

    pub async fn search_filters(
        &self,
        query: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<CategoryFilterRecord>, AppError> {
        let key = CacheKey::CategoryFiltersSearch { query, page, size };
        self.engine
            .read_through(key, || async move {
                self.categories
                    .search_filters(query, page, size)
                    .await
                    .map(Some)
            })
            .await
    }

    /// Create a category. No single-entity key can exist for a new slug, so
    /// only the derived category entries are invalidated.
    pub async fn create_category(
        &self,
        params: CreateCategoryParams,
    ) -> Result<CategoryRecord, AppError> {
        self.engine
            .write_through(None, Some(KeyFamily::Categories), || async move {
                self.categories.create_category(params).await
            })
            .await
    }

    pub async fn update_category(
        &self,
        params: UpdateCategoryParams,
    ) -> Result<CategoryRecord, AppError> {
        let slug = params.slug.clone();
        self.engine
            .write_through(
                Some(CacheKey::Category(&slug)),
                Some(KeyFamily::Categories),
                || async move { self.categories.update_category(params).await },
            )
            .await
    }

    pub async fn delete_category(&self, slug: &str) -> Result<(), AppError> {
        self.engine
            .write_through(
                Some(CacheKey::Category(slug)),
                Some(KeyFamily::Categories),
                || async move { self.categories.delete_category(slug).await },
            )
            .await
    }
}
