// shopfront/src/api/mod.rs

//! REST gateway client and the source/sink traits the rest of the crate is
//! written against.

pub mod client;
pub mod dto;
pub mod identity;

use crate::catalog::ProductQuery;
use crate::error::Result;
use crate::models::{ActivityEvent, Product};
use async_trait::async_trait;

pub use client::ApiClient;
pub use dto::{RecommendationRequest, SearchPage};
pub use identity::{AnonymousIdentity, AuthSession, IdentityProvider, StaticIdentity};

/// Primary product data. Errors from here are shown to the shopper.
#[async_trait]
pub trait ProductSource: Send + Sync + 'static {
  async fn search(&self, query: &ProductQuery) -> Result<SearchPage>;

  async fn featured(&self, limit: u32) -> Result<Vec<Product>>;

  /// `NotFound` when the product does not exist.
  async fn product(&self, product_id: &str) -> Result<Product>;
}

/// Secondary product data. Callers are expected to swallow errors.
#[async_trait]
pub trait RecommendationSource: Send + Sync + 'static {
  async fn recommendations(&self, request: &RecommendationRequest) -> Result<Vec<Product>>;
}

#[async_trait]
pub trait ActivitySink: Send + Sync + 'static {
  async fn record(&self, event: &ActivityEvent) -> Result<()>;
}
