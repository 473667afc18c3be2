// shopfront/src/cart/mod.rs

//! Cart state: the store, its change signal, derived totals and the badge view.

pub mod badge;
pub mod events;
pub mod quantity;
pub mod store;
pub mod totals;

pub use badge::CartBadge;
pub use events::{CartChange, CartEvent};
pub use quantity::parse_quantity;
pub use store::CartStore;
pub use totals::{CartTotals, FLAT_SHIPPING_FEE, FREE_SHIPPING_THRESHOLD, TAX_RATE};
