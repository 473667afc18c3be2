// shopfront/src/models/activity.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
  View,
  AddToCart,
  Purchase,
}

impl ActivityKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      ActivityKind::View => "view",
      ActivityKind::AddToCart => "add_to_cart",
      ActivityKind::Purchase => "purchase",
    }
  }
}

/// Body of `POST /activity`. Write-only: nothing on the client reads these back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
  pub event_type: ActivityKind,
  pub product_id: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub user_id: Option<String>,
  pub session_id: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub quantity: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub order_id: Option<String>,
  pub timestamp: DateTime<Utc>,
}

impl ActivityEvent {
  pub fn new(event_type: ActivityKind, product_id: &str, session_id: &str, user_id: Option<String>) -> Self {
    Self {
      event_type,
      product_id: product_id.to_string(),
      user_id,
      session_id: session_id.to_string(),
      quantity: None,
      order_id: None,
      timestamp: Utc::now(),
    }
  }

  pub fn with_quantity(mut self, quantity: u32) -> Self {
    self.quantity = Some(quantity);
    self
  }

  pub fn with_order(mut self, order_id: &str) -> Self {
    self.order_id = Some(order_id.to_string());
    self
  }
}
