// shopfront/src/storefront.rs

//! `Storefront`: one handle wiring configuration, identity, the gateway
//! client, storage, the cart and the activity logger together.

use crate::activity::ActivityLogger;
use crate::api::{
  ActivitySink, AnonymousIdentity, ApiClient, AuthSession, IdentityProvider, ProductSource, RecommendationSource,
  StaticIdentity,
};
use crate::cart::{CartBadge, CartStore};
use crate::catalog::ProductFeed;
use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::flows::{
  add_to_cart_workflow, checkout_workflow, run_add_to_cart, run_checkout, view_product, AddToCartCtx, CheckoutCtx,
  CheckoutReceipt, ProductView,
};
use crate::models::{CartLineItem, Product};
use crate::recommendations::{
  load_sections, RecommendationContext, RecommendationKind, RecommendationSection, RecommendationWidget,
};
use crate::storage::{FileStorage, KeyValueStorage};
use crate::workflow::Workflow;
use std::sync::Arc;
use tracing::{info, instrument};

/// The collaborators a storefront is assembled from.
#[derive(Clone)]
pub struct StorefrontParts {
  pub products: Arc<dyn ProductSource>,
  pub recommendations: Arc<dyn RecommendationSource>,
  pub activity: Arc<dyn ActivitySink>,
  pub identity: Arc<dyn IdentityProvider>,
  pub storage: Arc<dyn KeyValueStorage>,
}

pub struct Storefront {
  config: StorefrontConfig,
  parts: StorefrontParts,
  cart: CartStore,
  activity: ActivityLogger,
  catalog: ProductFeed,
  add_to_cart: Workflow<AddToCartCtx>,
  checkout: Workflow<CheckoutCtx>,
}

impl Storefront {
  /// Production wiring: gateway client from `config`, file storage under `data_dir`.
  #[instrument(name = "Storefront::open", skip_all, err(Display))]
  pub async fn open(config: StorefrontConfig) -> Result<Self> {
    let identity = identity_from_config(&config);
    let api = Arc::new(ApiClient::with_timeout(
      &config.api_url,
      identity.clone(),
      config.request_timeout,
    )?);
    let storage: Arc<dyn KeyValueStorage> = Arc::new(FileStorage::open(&config.data_dir).await?);
    info!(api_url = %config.api_url, "Storefront opened.");

    let parts = StorefrontParts {
      products: api.clone(),
      recommendations: api.clone(),
      activity: api,
      identity,
      storage,
    };
    Ok(Self::assemble(config, parts).await)
  }

  pub async fn assemble(config: StorefrontConfig, parts: StorefrontParts) -> Self {
    let cart = CartStore::open(parts.storage.clone()).await;
    cart.spawn_storage_listener();
    let activity = ActivityLogger::new(parts.activity.clone(), parts.identity.clone(), parts.storage.clone())
      .with_report_budget(config.activity_budget);
    let catalog = ProductFeed::new(parts.products.clone());
    Self {
      config,
      parts,
      cart,
      activity,
      catalog,
      add_to_cart: add_to_cart_workflow(),
      checkout: checkout_workflow(),
    }
  }

  pub fn config(&self) -> &StorefrontConfig {
    &self.config
  }

  pub fn cart(&self) -> &CartStore {
    &self.cart
  }

  pub fn activity(&self) -> &ActivityLogger {
    &self.activity
  }

  /// The shared catalog feed (search results and featured list).
  pub fn catalog(&self) -> &ProductFeed {
    &self.catalog
  }

  /// A fresh feed with its own request lifecycle.
  pub fn new_feed(&self) -> ProductFeed {
    ProductFeed::new(self.parts.products.clone())
  }

  pub fn badge(&self) -> CartBadge {
    CartBadge::attach(&self.cart)
  }

  pub fn widget(&self, kind: RecommendationKind) -> RecommendationWidget {
    RecommendationWidget::new(kind, self.parts.recommendations.clone())
  }

  pub async fn current_user_id(&self) -> Option<String> {
    self.parts.identity.current_user_id().await
  }

  pub async fn view_product(&self, product_id: &str) -> Result<ProductView> {
    view_product(&self.catalog, &self.activity, product_id).await
  }

  /// Adds `requested_quantity` (coerced to at least 1 and clamped to stock).
  pub async fn add_to_cart(&self, product: &Product, requested_quantity: i64) -> Result<CartLineItem> {
    let ctx = AddToCartCtx::new(
      self.cart.clone(),
      self.activity.clone(),
      product.clone(),
      requested_quantity,
    );
    run_add_to_cart(&self.add_to_cart, ctx).await
  }

  pub async fn checkout(&self) -> Result<CheckoutReceipt> {
    let ctx = CheckoutCtx::new(self.cart.clone(), self.activity.clone());
    run_checkout(&self.checkout, ctx).await
  }

  /// Sections for a product page: frequently bought, similar, also viewed.
  pub async fn product_recommendations(&self, product: &Product) -> Vec<RecommendationSection> {
    let widgets = [
      RecommendationKind::FrequentlyBought,
      RecommendationKind::Similar,
      RecommendationKind::AlsoViewed,
    ]
    .map(|kind| self.widget(kind));
    let context = RecommendationContext::for_product(product);
    load_sections(&widgets, &context).await
  }

  /// The home-page "Recommended for You" section, when signed in.
  pub async fn personalized_recommendations(&self) -> Option<RecommendationSection> {
    let user_id = self.current_user_id().await?;
    self
      .widget(RecommendationKind::Personalized)
      .load(&RecommendationContext::for_user(user_id))
      .await
  }
}

fn identity_from_config(config: &StorefrontConfig) -> Arc<dyn IdentityProvider> {
  match (&config.id_token, &config.user_id) {
    (None, None) => Arc::new(AnonymousIdentity),
    (token, user_id) => Arc::new(StaticIdentity::new(AuthSession::new(
      token.clone().unwrap_or_default(),
      user_id.clone(),
    ))),
  }
}
