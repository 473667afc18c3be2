// shopfront/src/cart/events.rs

//! Signals broadcast by the cart store. Any view can subscribe and re-read the
//! cart without being wired to whoever mutated it.

/// What happened to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartChange {
  Added {
    line_id: String,
    product_id: String,
    /// Line quantity after the merge.
    quantity: u32,
  },
  Removed {
    line_id: String,
  },
  QuantityChanged {
    line_id: String,
    quantity: u32,
  },
  Cleared,
  /// The persisted cart was changed by another store and re-read.
  Resynced,
}

/// "Cart changed, re-read it." Carries the new item count so badge-style
/// subscribers do not need to touch the store at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartEvent {
  pub change: CartChange,
  pub item_count: u32,
}
