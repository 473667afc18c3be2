// shopfront/src/cart/store.rs

//! The single-owner cart store.
//!
//! All mutations go through one async write gate: mutate under the state lock,
//! serialize, release the lock, persist, then broadcast a `CartEvent`.
//! Persistence is best-effort. A failed write is logged and the in-memory cart
//! keeps the mutation.

use crate::cart::events::{CartChange, CartEvent};
use crate::cart::totals::CartTotals;
use crate::models::{CartLineItem, Product};
use crate::shared::Shared;
use crate::storage::{KeyValueStorage, StorageEvent, CART_KEY};
use rust_decimal::Decimal;
use std::sync::{Arc, Weak};
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

const EVENT_CAPACITY: usize = 32;

#[derive(Debug, Default)]
struct CartState {
  lines: Vec<CartLineItem>,
  /// Last value this store wrote (or read) under `CART_KEY`. Storage events
  /// carrying the same value are our own echo.
  last_persisted: Option<String>,
}

struct CartInner {
  storage: Arc<dyn KeyValueStorage>,
  state: Shared<CartState>,
  write_gate: Mutex<()>,
  events: broadcast::Sender<CartEvent>,
}

/// Cheap to clone; clones share the same cart.
#[derive(Clone)]
pub struct CartStore {
  inner: Arc<CartInner>,
}

impl std::fmt::Debug for CartStore {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let state = self.inner.state.read();
    f.debug_struct("CartStore")
      .field("lines", &state.lines.len())
      .field("subscribers", &self.inner.events.receiver_count())
      .finish()
  }
}

impl CartStore {
  /// Opens the cart persisted in `storage`. A missing or unreadable cart opens empty.
  #[instrument(name = "CartStore::open", skip_all)]
  pub async fn open(storage: Arc<dyn KeyValueStorage>) -> Self {
    let (lines, raw) = read_persisted(storage.as_ref()).await;
    info!(lines = lines.len(), "Cart loaded.");
    let (events, _) = broadcast::channel(EVENT_CAPACITY);
    Self {
      inner: Arc::new(CartInner {
        storage,
        state: Shared::new(CartState {
          lines,
          last_persisted: raw,
        }),
        write_gate: Mutex::new(()),
        events,
      }),
    }
  }

  pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
    self.inner.events.subscribe()
  }

  pub fn lines(&self) -> Vec<CartLineItem> {
    self.inner.state.read().lines.clone()
  }

  pub fn line(&self, line_id: &str) -> Option<CartLineItem> {
    self.inner.state.read().lines.iter().find(|l| l.id == line_id).cloned()
  }

  pub fn line_for_product(&self, product_id: &str) -> Option<CartLineItem> {
    self
      .inner
      .state
      .read()
      .lines
      .iter()
      .find(|l| l.product_id == product_id)
      .cloned()
  }

  pub fn line_count(&self) -> usize {
    self.inner.state.read().lines.len()
  }

  pub fn is_empty(&self) -> bool {
    self.inner.state.read().lines.is_empty()
  }

  /// Sum of quantities; what the header badge shows.
  pub fn item_count(&self) -> u32 {
    item_count(&self.inner.state.read().lines)
  }

  pub fn totals(&self) -> CartTotals {
    CartTotals::from_lines(&self.inner.state.read().lines)
  }

  /// Adds `quantity` units of `product`. A product already in the cart has its
  /// line incremented; otherwise a snapshot line is appended. Returns the line
  /// as it stands after the merge.
  #[instrument(name = "CartStore::add", skip(self, product), fields(product_id = %product.product_id))]
  pub async fn add(&self, product: &Product, quantity: u32) -> CartLineItem {
    let quantity = quantity.max(1);
    let _gate = self.inner.write_gate.lock().await;

    let line = self.inner.state.update(|state| {
      match state.lines.iter_mut().find(|l| l.product_id == product.product_id) {
        Some(existing) => {
          existing.quantity = existing.quantity.saturating_add(quantity);
          debug!(line_id = %existing.id, quantity = existing.quantity, "Merged into existing line.");
          existing.clone()
        }
        None => {
          let fresh = CartLineItem::snapshot(product, quantity);
          debug!(line_id = %fresh.id, "Appended new line.");
          state.lines.push(fresh.clone());
          fresh
        }
      }
    });

    self.persist().await;
    self.notify(CartChange::Added {
      line_id: line.id.clone(),
      product_id: line.product_id.clone(),
      quantity: line.quantity,
    });
    line
  }

  /// Removes the line with `line_id`. Returns false when there was no such line.
  #[instrument(name = "CartStore::remove", skip(self))]
  pub async fn remove(&self, line_id: &str) -> bool {
    let _gate = self.inner.write_gate.lock().await;
    self.remove_locked(line_id).await
  }

  /// Overwrites a line's quantity. Anything below one removes the line, the
  /// same as `remove`. Clamping to stock is up to the caller.
  #[instrument(name = "CartStore::set_quantity", skip(self))]
  pub async fn set_quantity(&self, line_id: &str, quantity: i64) -> Option<CartLineItem> {
    let _gate = self.inner.write_gate.lock().await;
    if quantity < 1 {
      self.remove_locked(line_id).await;
      return None;
    }
    let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

    let updated = self.inner.state.update(|state| {
      state.lines.iter_mut().find(|l| l.id == line_id).map(|line| {
        line.quantity = quantity;
        line.clone()
      })
    });

    match updated {
      Some(line) => {
        self.persist().await;
        self.notify(CartChange::QuantityChanged {
          line_id: line.id.clone(),
          quantity: line.quantity,
        });
        Some(line)
      }
      None => {
        debug!("No such line; quantity unchanged.");
        None
      }
    }
  }

  /// Empties the cart and deletes the persisted key.
  #[instrument(name = "CartStore::clear", skip(self))]
  pub async fn clear(&self) {
    let _gate = self.inner.write_gate.lock().await;
    self.inner.state.update(|state| {
      state.lines.clear();
      state.last_persisted = None;
    });
    if let Err(e) = self.inner.storage.remove(CART_KEY).await {
      error!(error = %e, "Failed to delete persisted cart; in-memory cart is already empty.");
    }
    self.notify(CartChange::Cleared);
  }

  /// Re-reads the persisted cart. Broadcasts `Resynced` and returns true when
  /// it differed from what this store holds.
  #[instrument(name = "CartStore::reload", skip(self))]
  pub async fn reload(&self) -> bool {
    let _gate = self.inner.write_gate.lock().await;
    let (lines, raw) = read_persisted(self.inner.storage.as_ref()).await;
    let changed = self.inner.state.update(|state| {
      if state.lines == lines {
        state.last_persisted = raw;
        return false;
      }
      state.lines = lines;
      state.last_persisted = raw;
      true
    });
    if changed {
      info!("Cart changed elsewhere; re-read from storage.");
      self.notify(CartChange::Resynced);
    }
    changed
  }

  /// Reacts to a write seen on the shared storage. Writes from this store are
  /// ignored; anything else to the cart key triggers a re-read, never an overwrite.
  pub async fn handle_storage_event(&self, event: &StorageEvent) -> bool {
    if event.key != CART_KEY {
      return false;
    }
    let own_echo = self.inner.state.read().last_persisted == event.new_value;
    if own_echo {
      return false;
    }
    self.reload().await
  }

  /// Follows the storage change feed on a background task, if the backend has one.
  /// The task holds only a weak handle and ends once the store is dropped.
  pub fn spawn_storage_listener(&self) -> Option<JoinHandle<()>> {
    let mut feed = self.inner.storage.watch()?;
    let weak: Weak<CartInner> = Arc::downgrade(&self.inner);
    Some(tokio::spawn(async move {
      loop {
        let received = feed.recv().await;
        let Some(inner) = weak.upgrade() else { break };
        let store = CartStore { inner };
        match received {
          Ok(event) => {
            store.handle_storage_event(&event).await;
          }
          Err(broadcast::error::RecvError::Lagged(skipped)) => {
            warn!(skipped, "Storage feed lagged; re-reading cart.");
            store.reload().await;
          }
          Err(broadcast::error::RecvError::Closed) => break,
        }
      }
      debug!("Cart storage listener stopped.");
    }))
  }

  // Caller holds the write gate.
  async fn remove_locked(&self, line_id: &str) -> bool {
    let removed = self.inner.state.update(|state| {
      let before = state.lines.len();
      state.lines.retain(|l| l.id != line_id);
      state.lines.len() != before
    });
    if !removed {
      debug!(%line_id, "No such line; nothing removed.");
      return false;
    }
    self.persist().await;
    self.notify(CartChange::Removed {
      line_id: line_id.to_string(),
    });
    true
  }

  // Caller holds the write gate.
  async fn persist(&self) {
    let serialized = {
      let mut state = self.inner.state.write();
      match serde_json::to_string(&state.lines) {
        Ok(json) => {
          state.last_persisted = Some(json.clone());
          json
        }
        Err(e) => {
          error!(error = %e, "Failed to serialize cart; not persisted.");
          return;
        }
      }
    };
    if let Err(e) = self.inner.storage.set(CART_KEY, &serialized).await {
      error!(error = %e, "Failed to persist cart; keeping in-memory state.");
    }
  }

  fn notify(&self, change: CartChange) {
    let event = CartEvent {
      change,
      item_count: self.item_count(),
    };
    // Err only means nobody is subscribed.
    let _ = self.inner.events.send(event);
  }
}

fn item_count(lines: &[CartLineItem]) -> u32 {
  lines.iter().fold(0u32, |acc, l| acc.saturating_add(l.quantity))
}

/// Reads and decodes the persisted cart. Never fails: unreadable storage and
/// malformed JSON both come back as an empty cart.
async fn read_persisted(storage: &dyn KeyValueStorage) -> (Vec<CartLineItem>, Option<String>) {
  let raw = match storage.get(CART_KEY).await {
    Ok(raw) => raw,
    Err(e) => {
      warn!(error = %e, "Could not read persisted cart; starting empty.");
      return (Vec::new(), None);
    }
  };
  let Some(raw) = raw else {
    return (Vec::new(), None);
  };
  match serde_json::from_str::<Vec<CartLineItem>>(&raw) {
    Ok(lines) => (normalize(lines), Some(raw)),
    Err(e) => {
      warn!(error = %e, "Persisted cart is malformed; treating as empty.");
      (Vec::new(), Some(raw))
    }
  }
}

/// Restores the one-line-per-product and quantity >= 1 invariants on data
/// that may have been written by something else. Lines with a negative price,
/// or whose total would overflow the cart subtotal, are dropped.
fn normalize(lines: Vec<CartLineItem>) -> Vec<CartLineItem> {
  let mut merged: Vec<CartLineItem> = Vec::with_capacity(lines.len());
  for mut line in lines {
    if line.price < Decimal::ZERO {
      warn!(product_id = %line.product_id, price = %line.price, "Dropping persisted line with a negative price.");
      continue;
    }
    line.quantity = line.quantity.max(1);
    match merged.iter_mut().find(|l| l.product_id == line.product_id) {
      Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
      None => merged.push(line),
    }
  }

  let mut subtotal = Decimal::ZERO;
  merged.retain(|line| match line.checked_line_total().and_then(|total| subtotal.checked_add(total)) {
    Some(next) => {
      subtotal = next;
      true
    }
    None => {
      warn!(product_id = %line.product_id, "Dropping persisted line whose total cannot be represented.");
      false
    }
  });
  merged
}
