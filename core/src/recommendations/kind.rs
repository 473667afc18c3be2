// shopfront/src/recommendations/kind.rs
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
  Similar,
  FrequentlyBought,
  AlsoViewed,
  /// Keyed by user rather than by product.
  Personalized,
}

impl RecommendationKind {
  pub const ALL: [RecommendationKind; 4] = [
    RecommendationKind::Similar,
    RecommendationKind::FrequentlyBought,
    RecommendationKind::AlsoViewed,
    RecommendationKind::Personalized,
  ];

  /// Value of the `type` parameter on the wire.
  pub fn wire_type(&self) -> &'static str {
    match self {
      RecommendationKind::Similar => "similar",
      RecommendationKind::FrequentlyBought => "frequently-bought",
      RecommendationKind::AlsoViewed => "also-viewed",
      RecommendationKind::Personalized => "personalized",
    }
  }

  pub fn limit(&self) -> u32 {
    match self {
      RecommendationKind::Similar => 8,
      RecommendationKind::FrequentlyBought => 4,
      RecommendationKind::AlsoViewed => 6,
      RecommendationKind::Personalized => 8,
    }
  }

  pub fn title(&self) -> &'static str {
    match self {
      RecommendationKind::Similar => "Similar Products",
      RecommendationKind::FrequentlyBought => "Frequently Bought Together",
      RecommendationKind::AlsoViewed => "Customers Also Viewed",
      RecommendationKind::Personalized => "Recommended for You",
    }
  }

  pub fn subtitle(&self, category: Option<&str>) -> Option<String> {
    match self {
      RecommendationKind::Similar => Some(match category.map(str::trim).filter(|c| !c.is_empty()) {
        Some(category) => format!("You might also like these {} products", category),
        None => "You might also like these products".to_string(),
      }),
      RecommendationKind::FrequentlyBought => Some("Customers who bought this item also bought".to_string()),
      RecommendationKind::AlsoViewed | RecommendationKind::Personalized => None,
    }
  }

  pub fn keyed_by_user(&self) -> bool {
    matches!(self, RecommendationKind::Personalized)
  }
}
