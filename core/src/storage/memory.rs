// shopfront/src/storage/memory.rs

use crate::error::Result;
use crate::storage::{KeyValueStorage, StorageEvent};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::trace;

const EVENT_CAPACITY: usize = 64;

/// In-process storage. Clones share entries and the change feed, which is how
/// two cart stores model two tabs over the same browser storage.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
  entries: Arc<Mutex<HashMap<String, String>>>,
  events: broadcast::Sender<StorageEvent>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    let (events, _) = broadcast::channel(EVENT_CAPACITY);
    Self {
      entries: Arc::new(Mutex::new(HashMap::new())),
      events,
    }
  }

  /// Seeds a raw value without publishing an event.
  pub fn with_entry(self, key: &str, value: &str) -> Self {
    self.entries.lock().insert(key.to_string(), value.to_string());
    self
  }

  pub fn raw(&self, key: &str) -> Option<String> {
    self.entries.lock().get(key).cloned()
  }

  fn publish(&self, key: &str, new_value: Option<String>) {
    // No receivers is fine: nobody is watching.
    let _ = self.events.send(StorageEvent {
      key: key.to_string(),
      new_value,
    });
  }
}

impl Default for MemoryStorage {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
  async fn get(&self, key: &str) -> Result<Option<String>> {
    Ok(self.entries.lock().get(key).cloned())
  }

  async fn set(&self, key: &str, value: &str) -> Result<()> {
    self.entries.lock().insert(key.to_string(), value.to_string());
    trace!(%key, bytes = value.len(), "memory storage write");
    self.publish(key, Some(value.to_string()));
    Ok(())
  }

  async fn remove(&self, key: &str) -> Result<()> {
    let existed = self.entries.lock().remove(key).is_some();
    if existed {
      self.publish(key, None);
    }
    Ok(())
  }

  fn watch(&self) -> Option<broadcast::Receiver<StorageEvent>> {
    Some(self.events.subscribe())
  }
}
