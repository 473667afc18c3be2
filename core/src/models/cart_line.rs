// shopfront/src/models/cart_line.rs

use crate::models::product::{Product, LOW_STOCK_THRESHOLD};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_VENDOR_NAME: &str = "ShopSmart";
pub const DEFAULT_STOCK_QUANTITY: u32 = 100;

/// One row of the cart. Price and descriptive fields are a snapshot taken
/// when the product was first added; later catalog changes do not reach it.
///
/// Fields written by older storefront builds may be missing from a persisted
/// cart; they are filled with the same defaults a fresh snapshot would use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
  /// Opaque per-line id, generated at insertion.
  #[serde(default = "new_line_id")]
  pub id: String,
  /// Merge identity: a cart holds at most one line per product.
  pub product_id: String,
  pub product_name: String,
  #[serde(with = "rust_decimal::serde::float")]
  pub price: Decimal,
  pub quantity: u32,
  #[serde(default)]
  pub image_url: String,
  #[serde(default = "default_vendor_name")]
  pub vendor_name: String,
  #[serde(default = "default_stock_quantity")]
  pub stock_quantity: u32,
}

impl CartLineItem {
  pub fn snapshot(product: &Product, quantity: u32) -> Self {
    Self {
      id: new_line_id(),
      product_id: product.product_id.clone(),
      product_name: product.product_name.clone(),
      price: product.price,
      quantity: quantity.max(1),
      image_url: product.primary_image(),
      vendor_name: product
        .vendor_name
        .clone()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_VENDOR_NAME.to_string()),
      stock_quantity: product
        .stock_quantity
        .filter(|s| *s > 0)
        .unwrap_or(DEFAULT_STOCK_QUANTITY),
    }
  }

  /// Saturates at `Decimal::MAX`; `checked_line_total` tells the two apart.
  pub fn line_total(&self) -> Decimal {
    self.price.saturating_mul(Decimal::from(self.quantity))
  }

  pub fn checked_line_total(&self) -> Option<Decimal> {
    self.price.checked_mul(Decimal::from(self.quantity))
  }

  /// Clamps a requested quantity into `[1, stock_quantity]`.
  pub fn clamp_quantity(&self, requested: i64) -> u32 {
    let ceiling = i64::from(self.stock_quantity.max(1));
    requested.clamp(1, ceiling) as u32
  }

  pub fn low_stock(&self) -> bool {
    self.stock_quantity < LOW_STOCK_THRESHOLD
  }
}

fn new_line_id() -> String {
  format!("CART-{}", Uuid::new_v4().simple())
}

fn default_vendor_name() -> String {
  DEFAULT_VENDOR_NAME.to_string()
}

fn default_stock_quantity() -> u32 {
  DEFAULT_STOCK_QUANTITY
}
