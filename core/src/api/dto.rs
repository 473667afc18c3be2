// shopfront/src/api/dto.rs

//! Wire shapes of the REST gateway.

use crate::catalog::Pagination;
use crate::models::Product;
use serde::{Deserialize, Serialize};

/// `GET /search`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchPage {
  #[serde(default)]
  pub products: Vec<Product>,
  #[serde(default)]
  pub pagination: Option<Pagination>,
}

/// `GET /products/{id}`
#[derive(Debug, Deserialize)]
pub(crate) struct ProductEnvelope {
  pub product: Product,
}

/// `GET /featured`
#[derive(Debug, Deserialize)]
pub(crate) struct FeaturedEnvelope {
  #[serde(default)]
  pub products: Vec<Product>,
}

/// `GET|POST /recommendations`
#[derive(Debug, Deserialize)]
pub(crate) struct RecommendationEnvelope {
  #[serde(default)]
  pub recommendations: Vec<Product>,
}

/// Body of `POST /recommendations`.
#[derive(Debug, Serialize)]
pub(crate) struct PersonalizedBody<'a> {
  pub user_id: &'a str,
  #[serde(rename = "type")]
  pub kind: &'a str,
  pub limit: u32,
}

/// What to ask the recommendation endpoint for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendationRequest {
  /// `GET /recommendations?product_id=..&type=..&limit=..`
  ForProduct {
    product_id: String,
    kind: &'static str,
    limit: u32,
  },
  /// `POST /recommendations` with the user id in the body.
  ForUser {
    user_id: String,
    kind: &'static str,
    limit: u32,
  },
}
