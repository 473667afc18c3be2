// shopfront/src/catalog/mod.rs
pub mod feed;
pub mod query;

pub use feed::{CatalogRequest, FeedState, FeedUpdate, ProductFeed, DEFAULT_FEATURED_LIMIT};
pub use query::{Pagination, ProductQuery, SortKey, ALL_CATEGORIES};
