// src/lib.rs

//! Shopfront: the client-side core of an e-commerce storefront.
//!
//! Shopfront keeps the state a storefront UI renders from, with features like:
//!  - A persisted cart store with one line per product and change notifications.
//!  - Cross-handle cart resync through a storage change feed.
//!  - Product feeds that drop stale responses.
//!  - Recommendation widgets that hide themselves on failure or empty results.
//!  - Fire-and-forget activity logging keyed by an anonymous session.
//!  - A REST gateway client carrying the identity provider's bearer token.
//!  - Add-to-cart and checkout flows built on a small step workflow runner.

pub mod activity;
pub mod api;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod flows;
pub mod models;
pub mod recommendations;
pub mod shared;
pub mod storage;
pub mod storefront;
pub mod workflow;

// --- Re-exports for the Public API ---

pub use crate::activity::{ActivityLogger, ActivityReport};
pub use crate::api::{
  ActivitySink, AnonymousIdentity, ApiClient, AuthSession, IdentityProvider, ProductSource, RecommendationRequest,
  RecommendationSource, SearchPage, StaticIdentity,
};
pub use crate::cart::{parse_quantity, CartBadge, CartChange, CartEvent, CartStore, CartTotals};
pub use crate::catalog::{CatalogRequest, FeedState, FeedUpdate, Pagination, ProductFeed, ProductQuery, SortKey};
pub use crate::config::StorefrontConfig;
pub use crate::error::{Result, StorefrontError};
pub use crate::flows::{CheckoutReceipt, ProductView};
pub use crate::models::{ActivityEvent, ActivityKind, CartLineItem, Product};
pub use crate::recommendations::{
  RecommendationContext, RecommendationKind, RecommendationSection, RecommendationWidget,
};
pub use crate::shared::Shared;
pub use crate::storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageEvent};
pub use crate::storefront::{Storefront, StorefrontParts};
pub use crate::workflow::{StepControl, Workflow, WorkflowOutcome};
