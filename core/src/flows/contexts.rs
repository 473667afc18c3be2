// shopfront/src/flows/contexts.rs

//! Data carried through the storefront workflows. Handlers receive these
//! wrapped in `Shared` and clone the service handles they need out of them.

use crate::activity::{ActivityLogger, ActivityReport};
use crate::cart::{CartStore, CartTotals};
use crate::models::{CartLineItem, Product};
use serde::Serialize;

#[derive(Clone)]
pub struct AddToCartCtx {
  pub cart: CartStore,
  pub activity: ActivityLogger,
  pub product: Product,
  /// Raw shopper input, before coercion.
  pub requested_quantity: i64,
  /// Quantity actually added, set by `validate_quantity`.
  pub quantity: u32,
  pub line: Option<CartLineItem>,
  pub activity_report: Option<ActivityReport>,
}

impl AddToCartCtx {
  pub fn new(cart: CartStore, activity: ActivityLogger, product: Product, requested_quantity: i64) -> Self {
    Self {
      cart,
      activity,
      product,
      requested_quantity,
      quantity: 1,
      line: None,
      activity_report: None,
    }
  }
}

#[derive(Clone)]
pub struct CheckoutCtx {
  pub cart: CartStore,
  pub activity: ActivityLogger,
  pub lines: Vec<CartLineItem>,
  pub totals: CartTotals,
  pub order_id: Option<String>,
  pub purchases_logged: usize,
}

impl CheckoutCtx {
  pub fn new(cart: CartStore, activity: ActivityLogger) -> Self {
    Self {
      cart,
      activity,
      lines: Vec::new(),
      totals: CartTotals::ZERO,
      order_id: None,
      purchases_logged: 0,
    }
  }
}

/// What the shopper sees after placing an order. No payment is taken.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutReceipt {
  pub order_id: String,
  pub lines: Vec<CartLineItem>,
  pub totals: CartTotals,
  pub purchases_logged: usize,
}
