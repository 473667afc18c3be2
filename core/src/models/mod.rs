// shopfront/src/models/mod.rs

//! Plain data carried between the gateway, the cart and the activity log.

pub mod activity;
pub mod cart_line;
pub mod product;

pub use activity::{ActivityEvent, ActivityKind};
pub use cart_line::CartLineItem;
pub use product::Product;
