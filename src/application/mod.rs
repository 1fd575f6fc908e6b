//! Application layer: cached catalog operations over repository ports.
//!
//! Each service owns one entity family. Reads go through
//! [`crate::cache::CacheEngine::read_through`]; writes go to the repository
//! first and then evict the affected cache entries.

pub mod categories;
pub mod error;
pub mod favorites;
pub mod items;
pub mod orders;
pub mod promotions;
pub mod repos;

pub use categories::CategoryService;
pub use error::AppError;
pub use favorites::FavoriteService;
pub use items::ItemService;
pub use orders::OrderService;
pub use promotions::PromotionService;
