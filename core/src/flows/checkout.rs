// shopfront/src/flows/checkout.rs

//! Checkout stub: prices the cart, issues an order reference, reports one
//! purchase per line and empties the cart. No payment is taken.

use crate::cart::CartTotals;
use crate::error::{Result, StorefrontError};
use crate::flows::contexts::{CheckoutCtx, CheckoutReceipt};
use crate::shared::Shared;
use crate::workflow::{StepControl, Workflow, WorkflowOutcome};
use futures_util::future::join_all;
use tracing::{info, warn};
use uuid::Uuid;

pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty!";

pub const CHECKOUT_STEPS: [(&str, bool); 5] = [
  ("ensure_cart_not_empty", false),
  ("price_order", false),
  ("issue_order_reference", false),
  ("log_purchases", true),
  ("clear_cart", false),
];

pub fn new_order_reference() -> String {
  format!("ORDER-{}", Uuid::new_v4().simple().to_string().to_uppercase())
}

pub fn checkout_workflow() -> Workflow<CheckoutCtx> {
  let mut w = Workflow::<CheckoutCtx>::new("checkout", &CHECKOUT_STEPS);

  w.on("ensure_cart_not_empty", |ctx: Shared<CheckoutCtx>| async move {
    let lines = { ctx.read().cart.lines() };
    if lines.is_empty() {
      warn!("Checkout attempted with an empty cart.");
      return Err(StorefrontError::Validation(EMPTY_CART_MESSAGE.to_string()));
    }
    ctx.write().lines = lines;
    Ok(StepControl::Continue)
  });

  w.on("price_order", |ctx: Shared<CheckoutCtx>| async move {
    let mut guard = ctx.write();
    let totals = CartTotals::from_lines(&guard.lines);
    guard.totals = totals;
    info!(subtotal = %guard.totals.subtotal, total = %guard.totals.total, "Order priced.");
    Ok(StepControl::Continue)
  });

  w.on("issue_order_reference", |ctx: Shared<CheckoutCtx>| async move {
    let order_id = new_order_reference();
    info!(%order_id, "Order reference issued.");
    ctx.write().order_id = Some(order_id);
    Ok(StepControl::Continue)
  });

  w.on("log_purchases", |ctx: Shared<CheckoutCtx>| async move {
    let (activity, lines, order_id) = {
      let guard = ctx.read();
      (guard.activity.clone(), guard.lines.clone(), guard.order_id.clone())
    };
    let Some(order_id) = order_id else {
      return Err(StorefrontError::Internal("no order reference to log".to_string()));
    };

    // All reports start before any is awaited; the wait is bounded by one budget.
    let handles: Vec<_> = lines
      .iter()
      .map(|line| activity.spawn_purchase(&line.product_id, line.quantity, &order_id))
      .collect();
    let reports = join_all(handles.into_iter().map(|handle| activity.settle(handle))).await;
    let recorded = reports.iter().filter(|report| report.is_recorded()).count();
    ctx.write().purchases_logged = recorded;
    Ok(StepControl::Continue)
  });

  w.on("clear_cart", |ctx: Shared<CheckoutCtx>| async move {
    let cart = { ctx.read().cart.clone() };
    cart.clear().await;
    Ok(StepControl::Continue)
  });

  w
}

pub async fn run_checkout(workflow: &Workflow<CheckoutCtx>, ctx: CheckoutCtx) -> Result<CheckoutReceipt> {
  let ctx = Shared::new(ctx);
  let outcome = workflow.run(ctx.clone()).await.map_err(StorefrontError::into_root_cause)?;
  if outcome == WorkflowOutcome::Stopped {
    return Err(StorefrontError::Internal("checkout stopped before completion".to_string()));
  }

  let guard = ctx.read();
  let order_id = guard
    .order_id
    .clone()
    .ok_or_else(|| StorefrontError::Internal("checkout finished without an order reference".to_string()))?;
  Ok(CheckoutReceipt {
    order_id,
    lines: guard.lines.clone(),
    totals: guard.totals,
    purchases_logged: guard.purchases_logged,
  })
}
