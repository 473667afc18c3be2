// tests/common/mod.rs
#![allow(dead_code)] // Each test binary uses a different subset of these helpers.

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use shopfront::{
  ActivityEvent, ActivitySink, KeyValueStorage, MemoryStorage, Product, ProductQuery, ProductSource,
  RecommendationRequest, RecommendationSource, Result, SearchPage, StorageEvent, StorefrontError,
};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, oneshot};
use tracing::Level;

// --- Helper for Tracing Setup (call once per test) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Fixtures ---

pub fn dec(value: &str) -> Decimal {
  Decimal::from_str(value).unwrap()
}

pub fn product(id: &str, price: &str) -> Product {
  Product::new(id, format!("Product {}", id), dec(price))
}

pub fn stocked_product(id: &str, price: &str, stock: u32) -> Product {
  let mut p = product(id, price);
  p.stock_quantity = Some(stock);
  p
}

// --- Storage that can be told to fail ---

/// Wraps a `MemoryStorage`; reads and writes can be switched to fail.
#[derive(Clone, Default)]
pub struct FlakyStorage {
  pub inner: MemoryStorage,
  pub fail_reads: Arc<AtomicBool>,
  pub fail_writes: Arc<AtomicBool>,
  pub writes: Arc<AtomicUsize>,
}

impl FlakyStorage {
  pub fn new(inner: MemoryStorage) -> Self {
    Self {
      inner,
      ..Self::default()
    }
  }

  pub fn fail_writes(&self, fail: bool) {
    self.fail_writes.store(fail, Ordering::SeqCst);
  }

  pub fn fail_reads(&self, fail: bool) {
    self.fail_reads.store(fail, Ordering::SeqCst);
  }
}

#[async_trait]
impl KeyValueStorage for FlakyStorage {
  async fn get(&self, key: &str) -> Result<Option<String>> {
    if self.fail_reads.load(Ordering::SeqCst) {
      return Err(StorefrontError::storage(key, "simulated read failure"));
    }
    self.inner.get(key).await
  }

  async fn set(&self, key: &str, value: &str) -> Result<()> {
    self.writes.fetch_add(1, Ordering::SeqCst);
    if self.fail_writes.load(Ordering::SeqCst) {
      return Err(StorefrontError::storage(key, "simulated quota exceeded"));
    }
    self.inner.set(key, value).await
  }

  async fn remove(&self, key: &str) -> Result<()> {
    if self.fail_writes.load(Ordering::SeqCst) {
      return Err(StorefrontError::storage(key, "simulated remove failure"));
    }
    self.inner.remove(key).await
  }

  fn watch(&self) -> Option<broadcast::Receiver<StorageEvent>> {
    self.inner.watch()
  }
}

// --- Catalog fake ---

/// Answers searches from a fixed product list keyed by query text. A search
/// can be held open with `hold(q)` until the returned sender fires.
#[derive(Default)]
pub struct FakeCatalog {
  pub results: Mutex<HashMap<String, Vec<Product>>>,
  pub featured: Mutex<Vec<Product>>,
  pub products: Mutex<HashMap<String, Product>>,
  pub gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
  pub failing: AtomicBool,
  pub search_calls: AtomicUsize,
}

impl FakeCatalog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_results(self, q: &str, products: Vec<Product>) -> Self {
    self.results.lock().insert(q.to_string(), products);
    self
  }

  pub fn with_product(self, product: Product) -> Self {
    self.products.lock().insert(product.product_id.clone(), product);
    self
  }

  pub fn with_featured(self, products: Vec<Product>) -> Self {
    *self.featured.lock() = products;
    self
  }

  /// The next search for `q` waits until the returned sender is used (or dropped).
  pub fn hold(&self, q: &str) -> oneshot::Sender<()> {
    let (tx, rx) = oneshot::channel();
    self.gates.lock().insert(q.to_string(), rx);
    tx
  }

  pub fn calls(&self) -> usize {
    self.search_calls.load(Ordering::SeqCst)
  }

  fn check_failing(&self) -> Result<()> {
    if self.failing.load(Ordering::SeqCst) {
      return Err(StorefrontError::Api {
        status: 503,
        body: "gateway unavailable".to_string(),
      });
    }
    Ok(())
  }
}

#[async_trait]
impl ProductSource for FakeCatalog {
  async fn search(&self, query: &ProductQuery) -> Result<SearchPage> {
    self.search_calls.fetch_add(1, Ordering::SeqCst);
    let q = query.q.clone().unwrap_or_default();
    let gate = self.gates.lock().remove(&q);
    if let Some(gate) = gate {
      let _ = gate.await;
    }
    self.check_failing()?;
    let products = self.results.lock().get(&q).cloned().unwrap_or_default();
    Ok(SearchPage {
      products,
      pagination: None,
    })
  }

  async fn featured(&self, limit: u32) -> Result<Vec<Product>> {
    self.check_failing()?;
    Ok(self.featured.lock().iter().take(limit as usize).cloned().collect())
  }

  async fn product(&self, product_id: &str) -> Result<Product> {
    self.check_failing()?;
    self
      .products
      .lock()
      .get(product_id)
      .cloned()
      .ok_or_else(|| StorefrontError::NotFound(format!("product '{}'", product_id)))
  }
}

// --- Recommendation fake ---

pub struct FakeRecommendations {
  pub products: Vec<Product>,
  pub fail: bool,
  pub requests: Mutex<Vec<RecommendationRequest>>,
}

impl FakeRecommendations {
  pub fn returning(products: Vec<Product>) -> Self {
    Self {
      products,
      fail: false,
      requests: Mutex::new(Vec::new()),
    }
  }

  pub fn failing() -> Self {
    Self {
      products: Vec::new(),
      fail: true,
      requests: Mutex::new(Vec::new()),
    }
  }

  pub fn request_count(&self) -> usize {
    self.requests.lock().len()
  }
}

#[async_trait]
impl RecommendationSource for FakeRecommendations {
  async fn recommendations(&self, request: &RecommendationRequest) -> Result<Vec<Product>> {
    self.requests.lock().push(request.clone());
    if self.fail {
      return Err(StorefrontError::Api {
        status: 500,
        body: "boom".to_string(),
      });
    }
    Ok(self.products.clone())
  }
}

// --- Activity sink fake ---

#[derive(Default)]
pub struct RecordingSink {
  pub events: Mutex<Vec<ActivityEvent>>,
  pub fail: AtomicBool,
}

impl RecordingSink {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn failing() -> Self {
    let sink = Self::default();
    sink.fail.store(true, Ordering::SeqCst);
    sink
  }

  pub fn recorded(&self) -> Vec<ActivityEvent> {
    self.events.lock().clone()
  }
}

#[async_trait]
impl ActivitySink for RecordingSink {
  async fn record(&self, event: &ActivityEvent) -> Result<()> {
    if self.fail.load(Ordering::SeqCst) {
      return Err(StorefrontError::Api {
        status: 502,
        body: "bad gateway".to_string(),
      });
    }
    self.events.lock().push(event.clone());
    Ok(())
  }
}

/// Accepts every event and never answers, like a gateway that stopped responding.
#[derive(Default)]
pub struct StalledSink {
  pub attempts: AtomicUsize,
}

#[async_trait]
impl ActivitySink for StalledSink {
  async fn record(&self, _event: &ActivityEvent) -> Result<()> {
    self.attempts.fetch_add(1, Ordering::SeqCst);
    std::future::pending::<()>().await;
    Ok(())
  }
}
