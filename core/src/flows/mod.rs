// shopfront/src/flows/mod.rs

//! Shopper-facing flows assembled from the cart, catalog and activity pieces.

pub mod add_to_cart;
pub mod checkout;
pub mod contexts;
pub mod view_product;

pub use add_to_cart::{add_to_cart_workflow, run_add_to_cart, ADD_TO_CART_STEPS};
pub use checkout::{checkout_workflow, new_order_reference, run_checkout, CHECKOUT_STEPS, EMPTY_CART_MESSAGE};
pub use contexts::{AddToCartCtx, CheckoutCtx, CheckoutReceipt};
pub use view_product::{view_product, ProductView};
