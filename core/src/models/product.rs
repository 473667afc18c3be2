// shopfront/src/models/product.rs

use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Stock level below which the storefront shows a "only a few left" warning.
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// A product as served by the gateway. The client never mutates it; the cart
/// copies what it needs into a `CartLineItem` at add time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  #[serde(alias = "id")]
  pub product_id: String,
  #[serde(alias = "name")]
  pub product_name: String,
  #[serde(
    serialize_with = "rust_decimal::serde::float::serialize",
    deserialize_with = "non_negative_price"
  )]
  pub price: Decimal,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub category: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub brand: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub images: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image_url: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub stock_quantity: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub rating: Option<f32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub popularity_score: Option<f32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub review_count: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub vendor_name: Option<String>,
  #[serde(
    default,
    with = "rust_decimal::serde::float_option",
    skip_serializing_if = "Option::is_none"
  )]
  pub original_price: Option<Decimal>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub discount_percentage: Option<f32>,
}

impl Product {
  /// Minimal product, mostly useful for fixtures and the CLI.
  pub fn new(product_id: impl Into<String>, product_name: impl Into<String>, price: Decimal) -> Self {
    Self {
      product_id: product_id.into(),
      product_name: product_name.into(),
      price,
      category: None,
      brand: None,
      description: None,
      images: Vec::new(),
      image_url: None,
      stock_quantity: None,
      rating: None,
      popularity_score: None,
      review_count: None,
      vendor_name: None,
      original_price: None,
      discount_percentage: None,
    }
  }

  /// First gallery image, then the single `image_url`, then a seeded placeholder.
  pub fn primary_image(&self) -> String {
    self
      .images
      .iter()
      .find(|url| !url.is_empty())
      .cloned()
      .or_else(|| self.image_url.clone().filter(|url| !url.is_empty()))
      .unwrap_or_else(|| placeholder_image(&self.product_id))
  }

  /// Star rating shown on cards. Products without a rating derive one from
  /// their popularity score (50 when that is missing too).
  pub fn display_rating(&self) -> f32 {
    match self.rating {
      Some(rating) if rating > 0.0 => rating.min(5.0),
      _ => {
        let popularity = self.popularity_score.unwrap_or(50.0);
        (popularity / 20.0).floor().clamp(0.0, 5.0)
      }
    }
  }

  pub fn in_stock(&self) -> bool {
    self.stock_quantity.map_or(true, |stock| stock > 0)
  }

  pub fn low_stock(&self) -> bool {
    self.stock_quantity.map_or(false, |stock| stock < LOW_STOCK_THRESHOLD)
  }

  /// Amount saved against `original_price`, if the product is discounted.
  pub fn savings(&self) -> Option<Decimal> {
    self
      .original_price
      .filter(|original| *original > self.price)
      .map(|original| original - self.price)
  }
}

pub(crate) fn placeholder_image(product_id: &str) -> String {
  format!("https://picsum.photos/seed/{}/800/800", product_id)
}

/// Reads a JSON number price and rejects anything below zero.
fn non_negative_price<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
  D: Deserializer<'de>,
{
  let price = rust_decimal::serde::float::deserialize(deserializer)?;
  if price < Decimal::ZERO {
    return Err(D::Error::custom(format!("price must not be negative, got {}", price)));
  }
  Ok(price)
}
