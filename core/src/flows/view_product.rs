// shopfront/src/flows/view_product.rs
use crate::activity::{ActivityLogger, ActivityReport};
use crate::catalog::ProductFeed;
use crate::error::Result;
use crate::models::Product;
use tracing::instrument;

/// A product detail page load.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductView {
  pub product: Product,
  pub activity: ActivityReport,
}

/// Fetches the product, then reports the view. A lookup failure is returned;
/// a reporting failure or a stalled report only shows up in `activity`.
#[instrument(name = "flows::view_product", skip(feed, activity))]
pub async fn view_product(feed: &ProductFeed, activity: &ActivityLogger, product_id: &str) -> Result<ProductView> {
  let product = feed.fetch_product(product_id).await?;
  let activity = activity.settle(activity.spawn_view(&product.product_id)).await;
  Ok(ProductView { product, activity })
}
