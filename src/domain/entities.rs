//! Catalog entities mirrored from durable storage.
//!
//! Every record round-trips through the value codec, so the derives here
//! include `Deserialize` and `PartialEq` alongside the usual `Serialize`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::types::{FilterKind, OrderStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub labels: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub category_slug: String,
    pub parent_id: Option<Uuid>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub parent_slug: Option<String>,
    pub position: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A filter definition attached to a category, e.g. a brand option list or a
/// price range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryFilterRecord {
    pub category_slug: String,
    pub name: String,
    pub kind: FilterKind,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromotionRecord {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub discount_percent: f64,
    pub starts_at: OffsetDateTime,
    pub ends_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub item_id: Uuid,
    pub quantity: u32,
    pub unit_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: i64,
    pub user_id: Uuid,
    pub status: OrderStatus,
    pub lines: Vec<OrderLine>,
    pub total: f64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub item_id: Uuid,
    pub added_at: OffsetDateTime,
}
