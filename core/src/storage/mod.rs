// shopfront/src/storage/mod.rs

//! Durable client-side key/value storage.
//!
//! The storefront keeps exactly two keys: the serialized cart and the
//! anonymous session id. Backends may also publish `StorageEvent`s so that a
//! second cart store sharing the same storage (another "tab") can re-read
//! instead of overwriting.

pub mod file;
pub mod memory;

use crate::error::Result;
use async_trait::async_trait;
use tokio::sync::broadcast;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Key holding the JSON array of cart line items.
pub const CART_KEY: &str = "shopping_cart";
/// Key holding the anonymous session identifier.
pub const SESSION_KEY: &str = "session_id";

/// A write or removal observed on a storage backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
  pub key: String,
  /// `None` when the key was removed.
  pub new_value: Option<String>,
}

#[async_trait]
pub trait KeyValueStorage: Send + Sync + 'static {
  async fn get(&self, key: &str) -> Result<Option<String>>;

  async fn set(&self, key: &str, value: &str) -> Result<()>;

  /// Removing a missing key is not an error.
  async fn remove(&self, key: &str) -> Result<()>;

  /// Change feed for backends that can observe writes from other handles.
  fn watch(&self) -> Option<broadcast::Receiver<StorageEvent>> {
    None
  }
}
