//! Cached order operations.

use std::sync::Arc;

use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::repos::{CreateOrderParams, OrdersRepo, Page, UpdateOrderParams};
use crate::cache::{CacheEngine, CacheKey, KeyFamily};
use crate::domain::entities::OrderRecord;

#[derive(Clone)]
pub struct OrderService {
    engine: CacheEngine,
    orders: Arc<dyn OrdersRepo>,
}

impl OrderService {
    pub fn new(engine: CacheEngine, orders: Arc<dyn OrdersRepo>) -> Self {
        Self { engine, orders }
    }

    pub async fn get_order(&self, id: i64) -> Result<OrderRecord, AppError> {
        self.engine
            .read_through(CacheKey::Order(id), || async move {
                self.orders.find_by_id(id).await
            })
            .await
    }

    pub async fn list_user_orders(
        &self,
        user_id: Uuid,
        page: u32,
        size: u32,
    ) -> Result<Page<OrderRecord>, AppError> {
        let key = CacheKey::UserOrders {
            user_id,
            page,
            size,
        };
        self.engine
            .read_through(key, || async move {
                self.orders
                    .list_user_orders(user_id, page, size)
                    .await
                    .map(Some)
            })
            .await
    }

    /// Every order, unpaginated. The back-office callers that use this want
    /// current rows, so it bypasses the cache entirely.
    pub async fn list_all(&self) -> Result<Vec<OrderRecord>, AppError> {
        self.orders.list_all().await.map_err(AppError::from)
    }

    /// Create an order; only the derived order listings are invalidated.
    pub async fn create_order(&self, params: CreateOrderParams) -> Result<OrderRecord, AppError> {
        self.engine
            .write_through(None, Some(KeyFamily::Orders), || async move {
                self.orders.create_order(params).await
            })
            .await
    }

    pub async fn update_order(&self, params: UpdateOrderParams) -> Result<OrderRecord, AppError> {
        let target = CacheKey::Order(params.id);
        self.engine
            .write_through(Some(target), Some(KeyFamily::Orders), || async move {
                self.orders.update_order(params).await
            })
            .await
    }

    pub async fn cancel_order(&self, id: i64) -> Result<OrderRecord, AppError> {
        self.engine
            .write_through(
                Some(CacheKey::Order(id)),
                Some(KeyFamily::Orders),
                || async move { self.orders.cancel_order(id).await },
            )
            .await
    }
}
