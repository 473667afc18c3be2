// shopfront/src/activity/logger.rs
use crate::activity::session::load_or_create_session_id;
use crate::api::{ActivitySink, IdentityProvider};
use crate::models::{ActivityEvent, ActivityKind};
use crate::storage::KeyValueStorage;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

/// Outcome of one logging call. Never an error: the shopper's action has
/// already happened and must not be failed by analytics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityReport {
  Recorded,
  Dropped { reason: String },
}

impl ActivityReport {
  pub fn is_recorded(&self) -> bool {
    matches!(self, ActivityReport::Recorded)
  }
}

/// How long a flow waits for a detached report before moving on.
pub const DEFAULT_REPORT_BUDGET: Duration = Duration::from_secs(2);

/// Best-effort reporter of views, add-to-cart and purchase events.
///
/// `log_*` await the sink. Flows use `spawn_*` and `settle` instead, so a
/// stalled gateway costs them at most the report budget.
#[derive(Clone)]
pub struct ActivityLogger {
  sink: Arc<dyn ActivitySink>,
  identity: Arc<dyn IdentityProvider>,
  storage: Arc<dyn KeyValueStorage>,
  session_id: Arc<OnceCell<String>>,
  report_budget: Duration,
}

impl ActivityLogger {
  pub fn new(
    sink: Arc<dyn ActivitySink>,
    identity: Arc<dyn IdentityProvider>,
    storage: Arc<dyn KeyValueStorage>,
  ) -> Self {
    Self {
      sink,
      identity,
      storage,
      session_id: Arc::new(OnceCell::new()),
      report_budget: DEFAULT_REPORT_BUDGET,
    }
  }

  pub fn with_report_budget(mut self, budget: Duration) -> Self {
    self.report_budget = budget;
    self
  }

  /// Resolved once per logger, then reused.
  pub async fn session_id(&self) -> String {
    self
      .session_id
      .get_or_init(|| load_or_create_session_id(self.storage.as_ref()))
      .await
      .clone()
  }

  pub async fn log_view(&self, product_id: &str) -> ActivityReport {
    self.dispatch(ActivityKind::View, product_id, None, None).await
  }

  pub async fn log_add_to_cart(&self, product_id: &str, quantity: u32) -> ActivityReport {
    self
      .dispatch(ActivityKind::AddToCart, product_id, Some(quantity), None)
      .await
  }

  pub async fn log_purchase(&self, product_id: &str, quantity: u32, order_id: &str) -> ActivityReport {
    self
      .dispatch(ActivityKind::Purchase, product_id, Some(quantity), Some(order_id))
      .await
  }

  pub fn spawn_view(&self, product_id: &str) -> JoinHandle<ActivityReport> {
    let logger = self.clone();
    let product_id = product_id.to_string();
    tokio::spawn(async move { logger.log_view(&product_id).await })
  }

  pub fn spawn_add_to_cart(&self, product_id: &str, quantity: u32) -> JoinHandle<ActivityReport> {
    let logger = self.clone();
    let product_id = product_id.to_string();
    tokio::spawn(async move { logger.log_add_to_cart(&product_id, quantity).await })
  }

  pub fn spawn_purchase(&self, product_id: &str, quantity: u32, order_id: &str) -> JoinHandle<ActivityReport> {
    let logger = self.clone();
    let product_id = product_id.to_string();
    let order_id = order_id.to_string();
    tokio::spawn(async move { logger.log_purchase(&product_id, quantity, &order_id).await })
  }

  /// Waits up to the report budget for a spawned report. Past the budget the
  /// task keeps running detached and the report comes back as dropped.
  pub async fn settle(&self, handle: JoinHandle<ActivityReport>) -> ActivityReport {
    match tokio::time::timeout(self.report_budget, handle).await {
      Ok(Ok(report)) => report,
      Ok(Err(e)) => {
        warn!(error = %e, "Activity task did not complete.");
        ActivityReport::Dropped { reason: e.to_string() }
      }
      Err(_) => {
        debug!(budget_ms = self.report_budget.as_millis() as u64, "Activity still in flight; not waiting.");
        ActivityReport::Dropped {
          reason: format!("still in flight after {}ms", self.report_budget.as_millis()),
        }
      }
    }
  }

  #[instrument(name = "ActivityLogger::dispatch", skip(self))]
  async fn dispatch(
    &self,
    kind: ActivityKind,
    product_id: &str,
    quantity: Option<u32>,
    order_id: Option<&str>,
  ) -> ActivityReport {
    let product_id = product_id.trim();
    if product_id.is_empty() || product_id == "undefined" {
      warn!("Activity without a product id; not sent.");
      return ActivityReport::Dropped {
        reason: "missing product id".to_string(),
      };
    }

    let session_id = self.session_id().await;
    let user_id = self.identity.current_user_id().await;
    let mut event = ActivityEvent::new(kind, product_id, &session_id, user_id);
    if let Some(quantity) = quantity {
      event = event.with_quantity(quantity);
    }
    if let Some(order_id) = order_id {
      event = event.with_order(order_id);
    }

    match self.sink.record(&event).await {
      Ok(()) => {
        debug!(event_type = kind.as_str(), "Activity recorded.");
        ActivityReport::Recorded
      }
      Err(e) => {
        warn!(error = %e, event_type = kind.as_str(), "Failed to record activity.");
        ActivityReport::Dropped { reason: e.to_string() }
      }
    }
  }
}
