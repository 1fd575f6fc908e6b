//! Cached promotion operations.

use std::sync::Arc;

use crate::application::error::AppError;
use crate::application::repos::{
    CreatePromotionParams, Page, PromotionsRepo, UpdatePromotionParams,
};
use crate::cache::{CacheEngine, CacheKey, KeyFamily};
use crate::domain::entities::{ItemRecord, PromotionRecord};

#[derive(Clone)]
pub struct PromotionService {
    engine: CacheEngine,
    promotions: Arc<dyn PromotionsRepo>,
}

impl PromotionService {
    pub fn new(engine: CacheEngine, promotions: Arc<dyn PromotionsRepo>) -> Self {
        Self { engine, promotions }
    }

    pub async fn get_promotion(&self, slug: &str) -> Result<PromotionRecord, AppError> {
        self.engine
            .read_through(CacheKey::Promo(slug), || async move {
                self.promotions.find_by_slug(slug).await
            })
            .await
    }

    pub async fn list_promotions(
        &self,
        page: u32,
        size: u32,
    ) -> Result<Page<PromotionRecord>, AppError> {
        self.engine
            .read_through(CacheKey::PromosList { page, size }, || async move {
                self.promotions.list_promotions(page, size).await.map(Some)
            })
            .await
    }

    pub async fn search_promotions(
        &self,
        query: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<PromotionRecord>, AppError> {
        let key = CacheKey::PromosSearch { query, page, size };
        self.engine
            .read_through(key, || async move {
                self.promotions
                    .search_promotions(query, page, size)
                    .await
                    .map(Some)
            })
            .await
    }

    /// Items participating in a promotion. The page caches under the item
    /// family ([`CacheKey::PromoItems`]), so item writes refresh it while
    /// promotion metadata edits leave it alone.
    pub async fn list_promotion_items(
        &self,
        slug: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<ItemRecord>, AppError> {
        let key = CacheKey::PromoItems { slug, page, size };
        self.engine
            .read_through(key, || async move {
                self.promotions
                    .list_promotion_items(slug, page, size)
                    .await
                    .map(Some)
            })
            .await
    }

    /// Create a promotion; only derived promotion entries are invalidated.
    pub async fn create_promotion(
        &self,
        params: CreatePromotionParams,
    ) -> Result<PromotionRecord, AppError> {
        self.engine
            .write_through(None, Some(KeyFamily::Promos), || async move {
                self.promotions.create_promotion(params).await
            })
            .await
    }

    pub async fn update_promotion(
        &self,
        params: UpdatePromotionParams,
    ) -> Result<PromotionRecord, AppError> {
        let slug = params.slug.clone();
        self.engine
            .write_through(
                Some(CacheKey::Promo(&slug)),
                Some(KeyFamily::Promos),
                || async move { self.promotions.update_promotion(params).await },
            )
            .await
    }

    pub async fn delete_promotion(&self, slug: &str) -> Result<(), AppError> {
        self.engine
            .write_through(
                Some(CacheKey::Promo(slug)),
                Some(KeyFamily::Promos),
                || async move { self.promotions.delete_promotion(slug).await },
            )
            .await
    }
}
