// shopfront/src/recommendations/widget.rs
use crate::api::{RecommendationRequest, RecommendationSource};
use crate::models::Product;
use crate::recommendations::kind::RecommendationKind;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// What a widget is shown next to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationContext {
  pub product_id: Option<String>,
  pub category: Option<String>,
  pub user_id: Option<String>,
}

impl RecommendationContext {
  pub fn for_product(product: &Product) -> Self {
    Self {
      product_id: Some(product.product_id.clone()),
      category: product.category.clone(),
      user_id: None,
    }
  }

  pub fn for_user(user_id: impl Into<String>) -> Self {
    Self {
      user_id: Some(user_id.into()),
      ..Self::default()
    }
  }

  pub fn with_user(mut self, user_id: Option<String>) -> Self {
    self.user_id = user_id;
    self
  }
}

/// A rendered-ready block of recommendations. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationSection {
  pub kind: RecommendationKind,
  pub title: String,
  pub subtitle: Option<String>,
  pub products: Vec<Product>,
}

#[derive(Clone)]
pub struct RecommendationWidget {
  kind: RecommendationKind,
  source: Arc<dyn RecommendationSource>,
}

impl RecommendationWidget {
  pub fn new(kind: RecommendationKind, source: Arc<dyn RecommendationSource>) -> Self {
    Self { kind, source }
  }

  pub fn kind(&self) -> RecommendationKind {
    self.kind
  }

  /// Fetches the section for `context`. Any failure, a missing key or an empty
  /// list yields `None`; the caller renders nothing.
  #[instrument(name = "RecommendationWidget::load", skip(self, context), fields(kind = self.kind.wire_type()))]
  pub async fn load(&self, context: &RecommendationContext) -> Option<RecommendationSection> {
    let request = self.request_for(context)?;

    let products = match self.source.recommendations(&request).await {
      Ok(products) => products,
      Err(e) => {
        warn!(error = %e, "Recommendations unavailable; hiding section.");
        return None;
      }
    };

    let anchor = valid_key(context.product_id.as_deref());
    let products: Vec<Product> = products
      .into_iter()
      .filter(|p| Some(p.product_id.as_str()) != anchor)
      .take(self.kind.limit() as usize)
      .collect();

    if products.is_empty() {
      debug!("No recommendations; hiding section.");
      return None;
    }

    Some(RecommendationSection {
      kind: self.kind,
      title: self.kind.title().to_string(),
      subtitle: self.kind.subtitle(context.category.as_deref()),
      products,
    })
  }

  fn request_for(&self, context: &RecommendationContext) -> Option<RecommendationRequest> {
    let kind = self.kind.wire_type();
    let limit = self.kind.limit();
    if self.kind.keyed_by_user() {
      let Some(user_id) = valid_key(context.user_id.as_deref()) else {
        debug!("No user id; skipping personalized recommendations.");
        return None;
      };
      return Some(RecommendationRequest::ForUser {
        user_id: user_id.to_string(),
        kind,
        limit,
      });
    }
    let Some(product_id) = valid_key(context.product_id.as_deref()) else {
      debug!("No usable product id; skipping recommendations.");
      return None;
    };
    Some(RecommendationRequest::ForProduct {
      product_id: product_id.to_string(),
      kind,
      limit,
    })
  }
}

/// Rejects blank keys and the literal `"undefined"` some callers pass through.
fn valid_key(key: Option<&str>) -> Option<&str> {
  key
    .map(str::trim)
    .filter(|k| !k.is_empty() && *k != "undefined" && *k != "null")
}

/// Loads every widget concurrently and keeps the sections that have something to show.
pub async fn load_sections(
  widgets: &[RecommendationWidget],
  context: &RecommendationContext,
) -> Vec<RecommendationSection> {
  let loads = widgets.iter().map(|w| w.load(context));
  futures_util::future::join_all(loads)
    .await
    .into_iter()
    .flatten()
    .collect()
}
