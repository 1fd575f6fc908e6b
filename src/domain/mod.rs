//! Domain layer types shared by the cache and application layers.

pub mod entities;
pub mod types;
