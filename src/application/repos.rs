//! Repository traits describing persistence adapters.
//!
//! The cache layer calls exactly one repository method per operation and
//! relies on three error kinds: [`RepoError::NotFound`],
//! [`RepoError::Duplicate`], and everything else. Retry policy, if any,
//! belongs to the adapter behind these traits.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::entities::{
    CategoryFilterRecord, CategoryRecord, FavoriteEntry, ItemRecord, OrderLine, OrderRecord,
    PromotionRecord,
};
use crate::domain::types::OrderStatus;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }

    pub fn duplicate(constraint: impl Into<String>) -> Self {
        Self::Duplicate {
            constraint: constraint.into(),
        }
    }
}

/// One page of an offset-paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: u32, size: u32, total: u64) -> Self {
        Self {
            items,
            page,
            size,
            total,
        }
    }

    pub fn empty(page: u32, size: u32) -> Self {
        Self {
            items: Vec::new(),
            page,
            size,
            total: 0,
        }
    }
}

/// Attribute filters scoping a category-items query.
///
/// The rendered form of this map is part of the cache key, so rendering must
/// be deterministic: entries iterate in lexicographic key order, sequences
/// keep their given order, and range bounds always print as `min` then `max`.
/// Two maps that compare equal always render to the same text regardless of
/// how they were built up.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterMap(BTreeMap<String, FilterValue>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Scalar(String),
    Many(Vec<String>),
    Range {
        min: Option<String>,
        max: Option<String>,
    },
}

impl FilterValue {
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(value.into())
    }

    pub fn many<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Many(values.into_iter().map(Into::into).collect())
    }

    pub fn range(min: Option<&str>, max: Option<&str>) -> Self {
        Self::Range {
            min: min.map(str::to_string),
            max: max.map(str::to_string),
        }
    }
}

impl FilterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FilterValue) {
        self.0.insert(name.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K: Into<String>> FromIterator<(K, FilterValue)> for FilterMap {
    fn from_iter<I: IntoIterator<Item = (K, FilterValue)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }
}

impl fmt::Display for FilterMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (index, (name, value)) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "{name}:{value}")?;
        }
        f.write_str("}")
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Scalar(value) => f.write_str(value),
            FilterValue::Many(values) => {
                f.write_str("[")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    f.write_str(value)?;
                }
                f.write_str("]")
            }
            FilterValue::Range { min, max } => {
                write!(
                    f,
                    "{{min:{},max:{}}}",
                    min.as_deref().unwrap_or(""),
                    max.as_deref().unwrap_or("")
                )
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateItemParams {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub labels: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub category_slug: String,
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct UpdateItemParams {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub labels: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub category_slug: String,
    pub parent_id: Option<Uuid>,
}

#[async_trait]
pub trait ItemsRepo: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ItemRecord>, RepoError>;

    async fn list_items(&self, page: u32, size: u32) -> Result<Page<ItemRecord>, RepoError>;

    async fn search_items(
        &self,
        query: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<ItemRecord>, RepoError>;

    /// Items sharing the given item's parent, the item itself excluded.
    async fn list_related(&self, id: Uuid) -> Result<Vec<ItemRecord>, RepoError>;

    async fn list_by_label(
        &self,
        label: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<ItemRecord>, RepoError>;

    async fn list_by_category(
        &self,
        slug: &str,
        page: u32,
        size: u32,
        filters: &FilterMap,
        sort: &str,
    ) -> Result<Page<ItemRecord>, RepoError>;

    async fn search_by_attributes(
        &self,
        query: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<ItemRecord>, RepoError>;

    async fn create_item(&self, params: CreateItemParams) -> Result<ItemRecord, RepoError>;

    async fn update_item(&self, params: UpdateItemParams) -> Result<ItemRecord, RepoError>;

    async fn delete_item(&self, id: Uuid) -> Result<(), RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateCategoryParams {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub parent_slug: Option<String>,
    pub position: i32,
}

#[derive(Debug, Clone)]
pub struct UpdateCategoryParams {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub parent_slug: Option<String>,
    pub position: i32,
}

#[async_trait]
pub trait CategoriesRepo: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<CategoryRecord>, RepoError>;

    async fn list_categories(
        &self,
        page: u32,
        size: u32,
    ) -> Result<Page<CategoryRecord>, RepoError>;

    async fn search_categories(
        &self,
        query: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<CategoryRecord>, RepoError>;

    /// Filter definitions for one category; `NotFound` when the category
    /// does not exist.
    async fn list_filters(&self, slug: &str) -> Result<Vec<CategoryFilterRecord>, RepoError>;

    async fn search_filters(
        &self,
        query: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<CategoryFilterRecord>, RepoError>;

    async fn create_category(
        &self,
        params: CreateCategoryParams,
    ) -> Result<CategoryRecord, RepoError>;

    async fn update_category(
        &self,
        params: UpdateCategoryParams,
    ) -> Result<CategoryRecord, RepoError>;

    async fn delete_category(&self, slug: &str) -> Result<(), RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreatePromotionParams {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub discount_percent: f64,
    pub starts_at: OffsetDateTime,
    pub ends_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct UpdatePromotionParams {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub discount_percent: f64,
    pub starts_at: OffsetDateTime,
    pub ends_at: OffsetDateTime,
}

#[async_trait]
pub trait PromotionsRepo: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<PromotionRecord>, RepoError>;

    async fn list_promotions(
        &self,
        page: u32,
        size: u32,
    ) -> Result<Page<PromotionRecord>, RepoError>;

    async fn search_promotions(
        &self,
        query: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<PromotionRecord>, RepoError>;

    /// Items participating in a promotion; `NotFound` when the promotion
    /// does not exist.
    async fn list_promotion_items(
        &self,
        slug: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<ItemRecord>, RepoError>;

    async fn create_promotion(
        &self,
        params: CreatePromotionParams,
    ) -> Result<PromotionRecord, RepoError>;

    async fn update_promotion(
        &self,
        params: UpdatePromotionParams,
    ) -> Result<PromotionRecord, RepoError>;

    async fn delete_promotion(&self, slug: &str) -> Result<(), RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateOrderParams {
    pub user_id: Uuid,
    pub lines: Vec<OrderLine>,
}

#[derive(Debug, Clone)]
pub struct UpdateOrderParams {
    pub id: i64,
    pub status: OrderStatus,
}

#[async_trait]
pub trait OrdersRepo: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<OrderRecord>, RepoError>;

    async fn list_user_orders(
        &self,
        user_id: Uuid,
        page: u32,
        size: u32,
    ) -> Result<Page<OrderRecord>, RepoError>;

    async fn list_all(&self) -> Result<Vec<OrderRecord>, RepoError>;

    async fn create_order(&self, params: CreateOrderParams) -> Result<OrderRecord, RepoError>;

    async fn update_order(&self, params: UpdateOrderParams) -> Result<OrderRecord, RepoError>;

    async fn cancel_order(&self, id: i64) -> Result<OrderRecord, RepoError>;
}

#[async_trait]
pub trait FavoritesRepo: Send + Sync {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<FavoriteEntry>, RepoError>;

    /// `Duplicate` when the item is already on the user's list.
    async fn add_favorite(&self, user_id: Uuid, item_id: Uuid) -> Result<(), RepoError>;

    /// `NotFound` when the item is not on the user's list.
    async fn remove_favorite(&self, user_id: Uuid, item_id: Uuid) -> Result<(), RepoError>;
}
