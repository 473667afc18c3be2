// shopfront/src/flows/add_to_cart.rs
use crate::error::{Result, StorefrontError};
use crate::flows::contexts::AddToCartCtx;
use crate::models::cart_line::DEFAULT_STOCK_QUANTITY;
use crate::models::CartLineItem;
use crate::shared::Shared;
use crate::workflow::{StepControl, Workflow, WorkflowOutcome};
use rust_decimal::Decimal;
use tracing::{info, warn};

pub const ADD_TO_CART_STEPS: [(&str, bool); 3] = [
  ("validate_quantity", false),
  ("record_line_item", false),
  ("log_add_to_cart", true),
];

pub fn add_to_cart_workflow() -> Workflow<AddToCartCtx> {
  let mut w = Workflow::<AddToCartCtx>::new("add_to_cart", &ADD_TO_CART_STEPS);

  // Coerce to >= 1 and clamp to what is in stock.
  w.on("validate_quantity", |ctx: Shared<AddToCartCtx>| async move {
    let (requested, name, price, stock, in_stock) = {
      let guard = ctx.read();
      (
        guard.requested_quantity,
        guard.product.product_name.clone(),
        guard.product.price,
        guard.product.stock_quantity,
        guard.product.in_stock(),
      )
    };

    if price < Decimal::ZERO {
      warn!(product = %name, %price, "Add to cart rejected: negative price.");
      return Err(StorefrontError::Validation(format!("'{}' has an invalid price.", name)));
    }

    if !in_stock {
      warn!(product = %name, "Add to cart rejected: out of stock.");
      return Err(StorefrontError::Validation(format!("'{}' is out of stock.", name)));
    }

    let ceiling = stock.filter(|s| *s > 0).unwrap_or(DEFAULT_STOCK_QUANTITY);
    let quantity = requested.clamp(1, i64::from(ceiling)) as u32;
    if i64::from(quantity) != requested {
      info!(requested, quantity, "Adjusted requested quantity.");
    }
    ctx.write().quantity = quantity;
    Ok(StepControl::Continue)
  });

  w.on("record_line_item", |ctx: Shared<AddToCartCtx>| async move {
    let (cart, product, quantity) = {
      let guard = ctx.read();
      (guard.cart.clone(), guard.product.clone(), guard.quantity)
    };
    let line = cart.add(&product, quantity).await;
    info!(line_id = %line.id, quantity = line.quantity, "Line item recorded.");
    ctx.write().line = Some(line);
    Ok(StepControl::Continue)
  });

  w.on("log_add_to_cart", |ctx: Shared<AddToCartCtx>| async move {
    let (activity, product_id, quantity) = {
      let guard = ctx.read();
      (guard.activity.clone(), guard.product.product_id.clone(), guard.quantity)
    };
    let report = activity.settle(activity.spawn_add_to_cart(&product_id, quantity)).await;
    ctx.write().activity_report = Some(report);
    Ok(StepControl::Continue)
  });

  w
}

/// Runs `workflow` for `ctx` and returns the cart line as it stands afterwards.
pub async fn run_add_to_cart(workflow: &Workflow<AddToCartCtx>, ctx: AddToCartCtx) -> Result<CartLineItem> {
  let ctx = Shared::new(ctx);
  let outcome = workflow.run(ctx.clone()).await.map_err(StorefrontError::into_root_cause)?;
  if outcome == WorkflowOutcome::Stopped {
    info!("Add to cart stopped before completion.");
  }
  let line = ctx.read().line.clone();
  line.ok_or_else(|| StorefrontError::Internal("add to cart finished without recording a line".to_string()))
}
