// shopfront/src/cart/badge.rs
use crate::cart::store::CartStore;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::trace;

/// Live item count for a header badge. Follows the store's change signal and
/// never mutates the cart.
#[derive(Debug)]
pub struct CartBadge {
  count: watch::Receiver<u32>,
  task: JoinHandle<()>,
}

impl CartBadge {
  pub fn attach(store: &CartStore) -> Self {
    let mut events = store.subscribe();
    let (tx, rx) = watch::channel(store.item_count());
    let store = store.clone();

    let task = tokio::spawn(async move {
      loop {
        let next = match events.recv().await {
          Ok(event) => event.item_count,
          // Missed some events; the store itself is the truth.
          Err(broadcast::error::RecvError::Lagged(_)) => store.item_count(),
          Err(broadcast::error::RecvError::Closed) => break,
        };
        trace!(count = next, "Badge count updated.");
        if tx.send(next).is_err() {
          break;
        }
      }
    });

    Self { count: rx, task }
  }

  pub fn count(&self) -> u32 {
    *self.count.borrow()
  }

  /// Waits for the next published count and returns it.
  pub async fn changed(&mut self) -> Option<u32> {
    self.count.changed().await.ok()?;
    Some(*self.count.borrow_and_update())
  }
}

impl Drop for CartBadge {
  fn drop(&mut self) {
    self.task.abort();
  }
}
