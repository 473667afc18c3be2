// shopfront/src/catalog/query.rs
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StorefrontError;

/// Category value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
  #[default]
  Popularity,
  PriceAsc,
  PriceDesc,
  Rating,
  Newest,
}

impl SortKey {
  pub fn as_str(&self) -> &'static str {
    match self {
      SortKey::Popularity => "popularity",
      SortKey::PriceAsc => "price_asc",
      SortKey::PriceDesc => "price_desc",
      SortKey::Rating => "rating",
      SortKey::Newest => "newest",
    }
  }
}

impl fmt::Display for SortKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for SortKey {
  type Err = StorefrontError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim() {
      "popularity" => Ok(SortKey::Popularity),
      "price_asc" => Ok(SortKey::PriceAsc),
      "price_desc" => Ok(SortKey::PriceDesc),
      "rating" => Ok(SortKey::Rating),
      "newest" => Ok(SortKey::Newest),
      other => Err(StorefrontError::Validation(format!("unknown sort key '{}'", other))),
    }
  }
}

/// Parameters of a product search. Two queries are equal when they produce
/// the same query string, so a blank text and the `all` category match `None`.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
  pub q: Option<String>,
  pub category: Option<String>,
  pub min_price: Option<Decimal>,
  pub max_price: Option<Decimal>,
  pub sort_by: SortKey,
  pub page: Option<u32>,
  pub limit: Option<u32>,
}

impl ProductQuery {
  pub fn text(q: impl Into<String>) -> Self {
    Self {
      q: Some(q.into()),
      ..Self::default()
    }
  }

  pub fn with_category(mut self, category: impl Into<String>) -> Self {
    self.category = Some(category.into());
    self
  }

  pub fn with_price_range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
    self.min_price = min;
    self.max_price = max;
    self
  }

  pub fn sorted_by(mut self, sort_by: SortKey) -> Self {
    self.sort_by = sort_by;
    self
  }

  pub fn page(mut self, page: u32, limit: u32) -> Self {
    self.page = Some(page);
    self.limit = Some(limit);
    self
  }

  /// Query-string pairs. Blank values and the `all` category are left out.
  pub fn to_params(&self) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(q) = non_blank(self.q.as_deref()) {
      params.push(("q", q.to_string()));
    }
    if let Some(category) = non_blank(self.category.as_deref()) {
      if !category.eq_ignore_ascii_case(ALL_CATEGORIES) {
        params.push(("category", category.to_string()));
      }
    }
    if let Some(min) = self.min_price {
      params.push(("min_price", min.normalize().to_string()));
    }
    if let Some(max) = self.max_price {
      params.push(("max_price", max.normalize().to_string()));
    }
    params.push(("sort_by", self.sort_by.as_str().to_string()));
    if let Some(page) = self.page {
      params.push(("page", page.to_string()));
    }
    if let Some(limit) = self.limit {
      params.push(("limit", limit.to_string()));
    }
    params
  }
}

impl PartialEq for ProductQuery {
  fn eq(&self, other: &Self) -> bool {
    self.to_params() == other.to_params()
  }
}

impl Eq for ProductQuery {}

fn non_blank(value: Option<&str>) -> Option<&str> {
  value.map(str::trim).filter(|v| !v.is_empty())
}

/// Paging metadata returned with search results. Missing fields default to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
  #[serde(default)]
  pub page: u32,
  #[serde(default)]
  pub limit: u32,
  #[serde(default)]
  pub total: u64,
  #[serde(default)]
  pub total_pages: u32,
}

impl Pagination {
  pub fn has_next(&self) -> bool {
    self.page < self.total_pages
  }
}
