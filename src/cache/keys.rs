//! Cache key derivation.
//!
//! Every cached operation renders to a flat string key: an operation
//! identifier followed by its scoping arguments, `:`-separated. The strings
//! are stable across restarts so a warm cache survives process recycles;
//! treat every template here as a wire format.

use std::fmt;

use uuid::Uuid;

use crate::application::repos::FilterMap;

/// Key for a single cached operation.
///
/// Rendering is a pure function of the variant and its fields. Scalars use
/// their natural textual form: digits for integers, canonical hyphenated
/// UUIDs, raw strings for slugs, labels, and queries. The filter map renders
/// through its canonical [`FilterMap`] form.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheKey<'a> {
    Item(Uuid),
    ItemsList {
        page: u32,
        size: u32,
    },
    ItemsSearch {
        query: &'a str,
        page: u32,
        size: u32,
    },
    ItemsRelated(Uuid),
    ItemsByLabel {
        label: &'a str,
        page: u32,
        size: u32,
    },
    ItemsByCategory {
        slug: &'a str,
        page: u32,
        size: u32,
        filters: &'a FilterMap,
        sort: &'a str,
    },
    ItemsAttrSearch {
        query: &'a str,
        page: u32,
        size: u32,
    },
    Category(&'a str),
    CategoriesList {
        page: u32,
        size: u32,
    },
    CategoriesSearch {
        query: &'a str,
        page: u32,
        size: u32,
    },
    CategoryFilters(&'a str),
    CategoryFiltersSearch {
        query: &'a str,
        page: u32,
        size: u32,
    },
    Promo(&'a str),
    PromosList {
        page: u32,
        size: u32,
    },
    PromosSearch {
        query: &'a str,
        page: u32,
        size: u32,
    },
    /// Items participating in a promotion. Keyed under the `items-` prefix
    /// because the cached payload is a page of items; item writes must wipe
    /// it, promotion metadata writes need not.
    PromoItems {
        slug: &'a str,
        page: u32,
        size: u32,
    },
    Order(i64),
    UserOrders {
        user_id: Uuid,
        page: u32,
        size: u32,
    },
    Favorites(Uuid),
}

impl CacheKey<'_> {
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CacheKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Item(id) => write!(f, "item:{id}"),
            CacheKey::ItemsList { page, size } => write!(f, "items-list:{page}:{size}"),
            CacheKey::ItemsSearch { query, page, size } => {
                write!(f, "items-search:{query}:{page}:{size}")
            }
            CacheKey::ItemsRelated(id) => write!(f, "items-related:{id}"),
            CacheKey::ItemsByLabel { label, page, size } => {
                write!(f, "items-label:{label}:{page}:{size}")
            }
            CacheKey::ItemsByCategory {
                slug,
                page,
                size,
                filters,
                sort,
            } => write!(f, "items-category:{slug}:{page}:{size}:{filters}:{sort}"),
            CacheKey::ItemsAttrSearch { query, page, size } => {
                write!(f, "items-attr-search:{query}:{page}:{size}")
            }
            CacheKey::Category(slug) => write!(f, "category:{slug}"),
            CacheKey::CategoriesList { page, size } => write!(f, "categories-list:{page}:{size}"),
            CacheKey::CategoriesSearch { query, page, size } => {
                write!(f, "categories-search:{query}:{page}:{size}")
            }
            CacheKey::CategoryFilters(slug) => write!(f, "categories-filters-list:{slug}"),
            CacheKey::CategoryFiltersSearch { query, page, size } => {
                write!(f, "categories-filters-search:{query}:{page}:{size}")
            }
            CacheKey::Promo(slug) => write!(f, "promo:{slug}"),
            CacheKey::PromosList { page, size } => write!(f, "promos-list:{page}:{size}"),
            CacheKey::PromosSearch { query, page, size } => {
                write!(f, "promos-search:{query}:{page}:{size}")
            }
            CacheKey::PromoItems { slug, page, size } => {
                write!(f, "items-promos:{slug}:{page}:{size}")
            }
            CacheKey::Order(id) => write!(f, "order:{id}"),
            CacheKey::UserOrders {
                user_id,
                page,
                size,
            } => write!(f, "orders-user:{user_id}:{page}:{size}"),
            CacheKey::Favorites(user_id) => write!(f, "favorite:{user_id}"),
        }
    }
}

/// Entity family whose derived (list/search/related) entries are evicted
/// together by one wildcard pattern.
///
/// The patterns match every derived key of the family and never the
/// single-entity keys, which use singular prefixes (`item:`, `category:`,
/// `promo:`, `order:`, `favorite:`) and are evicted by exact delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFamily {
    Items,
    Categories,
    Promos,
    Orders,
}

impl KeyFamily {
    pub fn pattern(self) -> &'static str {
        match self {
            KeyFamily::Items => "items-*",
            KeyFamily::Categories => "categories-*",
            KeyFamily::Promos => "promos-*",
            KeyFamily::Orders => "orders-*",
        }
    }
}
