// shopfront/src/cart/totals.rs

use crate::models::CartLineItem;
use rust_decimal::Decimal;
use serde::Serialize;

/// 10% sales tax.
pub const TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);
/// Orders strictly above this subtotal ship free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
/// Flat shipping fee below the threshold.
pub const FLAT_SHIPPING_FEE: Decimal = Decimal::from_parts(999, 0, 0, false, 2);

/// Order summary derived from the cart lines. Never stored. Arithmetic
/// saturates instead of overflowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartTotals {
  pub subtotal: Decimal,
  pub tax: Decimal,
  pub shipping: Decimal,
  pub total: Decimal,
}

impl CartTotals {
  pub const ZERO: CartTotals = CartTotals {
    subtotal: Decimal::ZERO,
    tax: Decimal::ZERO,
    shipping: Decimal::ZERO,
    total: Decimal::ZERO,
  };

  /// An empty cart has nothing to ship and totals to zero.
  pub fn from_lines(lines: &[CartLineItem]) -> Self {
    if lines.is_empty() {
      return Self::ZERO;
    }
    let subtotal = lines
      .iter()
      .map(CartLineItem::line_total)
      .fold(Decimal::ZERO, Decimal::saturating_add);
    Self::from_subtotal(subtotal)
  }

  pub fn from_subtotal(subtotal: Decimal) -> Self {
    let tax = subtotal.saturating_mul(TAX_RATE);
    let shipping = if subtotal > FREE_SHIPPING_THRESHOLD {
      Decimal::ZERO
    } else {
      FLAT_SHIPPING_FEE
    };
    Self {
      subtotal,
      tax,
      shipping,
      total: subtotal.saturating_add(tax).saturating_add(shipping),
    }
  }

  pub fn ships_free(&self) -> bool {
    self.shipping.is_zero()
  }

  /// How much more the shopper has to add to reach free shipping.
  pub fn free_shipping_remaining(&self) -> Option<Decimal> {
    if self.ships_free() {
      None
    } else {
      Some((FREE_SHIPPING_THRESHOLD - self.subtotal).max(Decimal::ZERO))
    }
  }
}
