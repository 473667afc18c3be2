// shopfront/src/recommendations/mod.rs

//! Secondary product lists shown beside a product or on the home page.
//! These degrade silently: a widget either has products to show or nothing.

pub mod kind;
pub mod widget;

pub use kind::RecommendationKind;
pub use widget::{load_sections, RecommendationContext, RecommendationSection, RecommendationWidget};
