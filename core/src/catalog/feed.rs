// shopfront/src/catalog/feed.rs
use crate::api::ProductSource;
use crate::catalog::query::{Pagination, ProductQuery};
use crate::error::Result;
use crate::models::Product;
use crate::shared::Shared;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_FEATURED_LIMIT: u32 = 12;

/// What a product list view renders from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedState {
  pub items: Vec<Product>,
  pub loading: bool,
  pub error: Option<String>,
  pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogRequest {
  Search(ProductQuery),
  Featured { limit: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedUpdate {
  Loaded { count: usize },
  Failed { message: String },
  /// A newer request started before this one resolved; its result was dropped.
  Superseded,
}

#[derive(Debug, Default)]
struct FeedSlot {
  state: FeedState,
  /// Bumped by every load; only the holder of the current ticket may write `state`.
  generation: u64,
  current: Option<CatalogRequest>,
}

/// Request lifecycle for one product list. Clones share the same state.
#[derive(Clone)]
pub struct ProductFeed {
  source: Arc<dyn ProductSource>,
  slot: Shared<FeedSlot>,
}

impl ProductFeed {
  pub fn new(source: Arc<dyn ProductSource>) -> Self {
    Self {
      source,
      slot: Shared::default(),
    }
  }

  pub fn state(&self) -> FeedState {
    self.slot.read().state.clone()
  }

  pub fn current_request(&self) -> Option<CatalogRequest> {
    self.slot.read().current.clone()
  }

  /// Issues `request`. Any load still in flight becomes stale.
  #[instrument(name = "ProductFeed::load", skip(self))]
  pub async fn load(&self, request: CatalogRequest) -> FeedUpdate {
    let ticket = self.slot.update(|slot| {
      slot.generation += 1;
      slot.current = Some(request.clone());
      slot.state.loading = true;
      slot.state.error = None;
      slot.generation
    });

    let outcome = match &request {
      CatalogRequest::Search(query) => self
        .source
        .search(query)
        .await
        .map(|page| (page.products, page.pagination)),
      CatalogRequest::Featured { limit } => self.source.featured(*limit).await.map(|items| (items, None)),
    };

    self.slot.update(|slot| {
      if slot.generation != ticket {
        debug!(ticket, current = slot.generation, "Dropping stale catalog response.");
        return FeedUpdate::Superseded;
      }
      slot.state.loading = false;
      match outcome {
        Ok((items, pagination)) => {
          let count = items.len();
          slot.state.items = items;
          slot.state.pagination = pagination;
          info!(count, "Catalog loaded.");
          FeedUpdate::Loaded { count }
        }
        Err(e) => {
          let message = e.to_string();
          warn!(error = %message, "Catalog request failed.");
          slot.state.error = Some(message.clone());
          FeedUpdate::Failed { message }
        }
      }
    })
  }

  /// Loads `query` unless it equals the current search. Returns `None` when
  /// nothing was issued.
  pub async fn set_query(&self, query: ProductQuery) -> Option<FeedUpdate> {
    let request = CatalogRequest::Search(query);
    if self.slot.read().current.as_ref() == Some(&request) {
      debug!("Query unchanged; not reissuing.");
      return None;
    }
    Some(self.load(request).await)
  }

  /// Re-issues the current request, if there is one.
  pub async fn refetch(&self) -> Option<FeedUpdate> {
    let current = self.current_request()?;
    Some(self.load(current).await)
  }

  pub async fn load_featured(&self, limit: u32) -> FeedUpdate {
    self.load(CatalogRequest::Featured { limit }).await
  }

  /// Product detail lookup. Errors are returned, not stored.
  pub async fn fetch_product(&self, product_id: &str) -> Result<Product> {
    self.source.product(product_id).await
  }
}
