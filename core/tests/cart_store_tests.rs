// tests/cart_store_tests.rs
mod common;

use common::*;
use serial_test::serial;
use shopfront::storage::CART_KEY;
use shopfront::{CartBadge, CartChange, CartLineItem, CartStore, KeyValueStorage, MemoryStorage, StorageEvent};
use std::sync::Arc;
use std::time::Duration;

async fn fresh_store() -> (CartStore, MemoryStorage) {
  let storage = MemoryStorage::new();
  let store = CartStore::open(Arc::new(storage.clone())).await;
  (store, storage)
}

#[tokio::test]
#[serial]
async fn test_adding_same_product_twice_merges_into_one_line() {
  setup_tracing();
  let (store, _) = fresh_store().await;
  let p1 = product("P1", "10");

  store.add(&p1, 1).await;
  let line = store.add(&p1, 1).await;

  let lines = store.lines();
  assert_eq!(lines.len(), 1);
  assert_eq!(lines[0].product_id, "P1");
  assert_eq!(lines[0].quantity, 2);
  assert_eq!(line.quantity, 2);
  assert_eq!(store.totals().subtotal, dec("20"));
}

#[tokio::test]
#[serial]
async fn test_add_increments_by_given_quantity_and_keeps_line_id() {
  setup_tracing();
  let (store, _) = fresh_store().await;
  let p = product("P1", "3.50");

  let first = store.add(&p, 2).await;
  let second = store.add(&p, 3).await;

  assert_eq!(first.id, second.id);
  assert_eq!(second.quantity, 5);
  assert_eq!(store.item_count(), 5);
  assert_eq!(store.line_count(), 1);
}

#[tokio::test]
#[serial]
async fn test_lines_keep_insertion_order() {
  setup_tracing();
  let (store, _) = fresh_store().await;
  store.add(&product("B", "1"), 1).await;
  store.add(&product("A", "1"), 1).await;
  store.add(&product("B", "1"), 1).await;

  let ids: Vec<String> = store.lines().into_iter().map(|l| l.product_id).collect();
  assert_eq!(ids, vec!["B", "A"]);
}

#[tokio::test]
#[serial]
async fn test_price_is_snapshotted_at_add_time() {
  setup_tracing();
  let (store, _) = fresh_store().await;
  let mut p = product("P1", "10");
  store.add(&p, 1).await;

  p.price = dec("99");
  store.add(&p, 1).await;

  assert_eq!(store.lines()[0].price, dec("10"));
  assert_eq!(store.totals().subtotal, dec("20"));
}

#[tokio::test]
#[serial]
async fn test_set_quantity_zero_behaves_like_remove() {
  setup_tracing();
  let (via_set, _) = fresh_store().await;
  let (via_remove, _) = fresh_store().await;
  for store in [&via_set, &via_remove] {
    store.add(&product("P1", "10"), 2).await;
    store.add(&product("P2", "5"), 1).await;
  }

  let set_line = via_set.line_for_product("P1").unwrap();
  let remove_line = via_remove.line_for_product("P1").unwrap();
  let mut set_events = via_set.subscribe();
  let mut remove_events = via_remove.subscribe();

  assert!(via_set.set_quantity(&set_line.id, 0).await.is_none());
  assert!(via_remove.remove(&remove_line.id).await);

  let strip = |lines: Vec<CartLineItem>| -> Vec<(String, u32)> {
    lines.into_iter().map(|l| (l.product_id, l.quantity)).collect()
  };
  assert_eq!(strip(via_set.lines()), strip(via_remove.lines()));
  assert_eq!(strip(via_set.lines()), vec![("P2".to_string(), 1)]);

  let set_event = set_events.recv().await.unwrap();
  let remove_event = remove_events.recv().await.unwrap();
  assert_eq!(set_event.change, CartChange::Removed { line_id: set_line.id });
  assert_eq!(remove_event.change, CartChange::Removed { line_id: remove_line.id });
  assert_eq!(set_event.item_count, remove_event.item_count);
}

#[tokio::test]
#[serial]
async fn test_set_quantity_negative_also_removes() {
  setup_tracing();
  let (store, _) = fresh_store().await;
  let line = store.add(&product("P1", "10"), 3).await;

  assert!(store.set_quantity(&line.id, -4).await.is_none());
  assert!(store.is_empty());
}

#[tokio::test]
#[serial]
async fn test_set_quantity_overwrites() {
  setup_tracing();
  let (store, storage) = fresh_store().await;
  let line = store.add(&product("P1", "10"), 1).await;

  let updated = store.set_quantity(&line.id, 7).await.unwrap();

  assert_eq!(updated.quantity, 7);
  assert_eq!(store.item_count(), 7);
  let persisted: Vec<CartLineItem> = serde_json::from_str(&storage.raw(CART_KEY).unwrap()).unwrap();
  assert_eq!(persisted[0].quantity, 7);
}

#[tokio::test]
#[serial]
async fn test_unknown_line_id_changes_nothing_and_does_not_notify() {
  setup_tracing();
  let (store, _) = fresh_store().await;
  store.add(&product("P1", "10"), 1).await;
  let mut events = store.subscribe();

  assert!(!store.remove("CART-missing").await);
  assert!(store.set_quantity("CART-missing", 4).await.is_none());

  assert_eq!(store.item_count(), 1);
  assert!(events.try_recv().is_err());
}

#[tokio::test]
#[serial]
async fn test_every_mutation_broadcasts_a_change() {
  setup_tracing();
  let (store, _) = fresh_store().await;
  let mut events = store.subscribe();

  let line = store.add(&product("P1", "10"), 1).await;
  store.set_quantity(&line.id, 3).await;
  store.remove(&line.id).await;
  store.add(&product("P2", "1"), 2).await;
  store.clear().await;

  let mut changes = Vec::new();
  while let Ok(event) = events.try_recv() {
    changes.push((event.change, event.item_count));
  }
  assert_eq!(changes.len(), 5);
  assert!(matches!(changes[0], (CartChange::Added { quantity: 1, .. }, 1)));
  assert!(matches!(changes[1], (CartChange::QuantityChanged { quantity: 3, .. }, 3)));
  assert!(matches!(changes[2], (CartChange::Removed { .. }, 0)));
  assert!(matches!(changes[3], (CartChange::Added { quantity: 2, .. }, 2)));
  assert_eq!(changes[4], (CartChange::Cleared, 0));
}

#[tokio::test]
#[serial]
async fn test_cart_survives_reopen() {
  setup_tracing();
  let storage = MemoryStorage::new();
  {
    let store = CartStore::open(Arc::new(storage.clone())).await;
    store.add(&product("P1", "10"), 2).await;
    store.add(&product("P2", "4.25"), 1).await;
  }

  let reopened = CartStore::open(Arc::new(storage)).await;
  assert_eq!(reopened.line_count(), 2);
  assert_eq!(reopened.totals().subtotal, dec("24.25"));
}

#[tokio::test]
#[serial]
async fn test_corrupted_cart_opens_empty_without_error() {
  setup_tracing();
  let storage = MemoryStorage::new().with_entry(CART_KEY, "{not json at all");
  let store = CartStore::open(Arc::new(storage.clone())).await;

  assert!(store.is_empty());
  assert_eq!(store.totals().total, dec("0"));

  // The next write replaces the garbage.
  store.add(&product("P1", "10"), 1).await;
  let persisted: Vec<CartLineItem> = serde_json::from_str(&storage.raw(CART_KEY).unwrap()).unwrap();
  assert_eq!(persisted.len(), 1);
}

#[tokio::test]
#[serial]
async fn test_wrong_shape_cart_opens_empty() {
  setup_tracing();
  let storage = MemoryStorage::new().with_entry(CART_KEY, r#"{"items": []}"#);
  let store = CartStore::open(Arc::new(storage)).await;
  assert!(store.is_empty());
}

#[tokio::test]
#[serial]
async fn test_unreadable_storage_opens_empty() {
  setup_tracing();
  let flaky = FlakyStorage::default();
  flaky.fail_reads(true);
  let store = CartStore::open(Arc::new(flaky)).await;
  assert!(store.is_empty());
}

#[tokio::test]
#[serial]
async fn test_legacy_cart_is_normalized_on_load() {
  setup_tracing();
  let legacy = r#"[
    {"id": "CART-1", "product_id": "P1", "product_name": "Lamp", "price": 10.0, "quantity": 0},
    {"id": "CART-2", "product_id": "P1", "product_name": "Lamp", "price": 10.0, "quantity": 2},
    {"product_id": "P2", "product_name": "Mug", "price": 4.5, "quantity": 1}
  ]"#;
  let storage = MemoryStorage::new().with_entry(CART_KEY, legacy);
  let store = CartStore::open(Arc::new(storage)).await;

  let lines = store.lines();
  assert_eq!(lines.len(), 2);
  assert_eq!(lines[0].id, "CART-1");
  assert_eq!(lines[0].quantity, 3);
  assert!(lines[1].id.starts_with("CART-"));
  assert_eq!(lines[1].vendor_name, "ShopSmart");
  assert_eq!(lines[1].stock_quantity, 100);
}

#[tokio::test]
#[serial]
async fn test_persisted_line_too_large_to_total_is_dropped() {
  setup_tracing();
  let stored = r#"[
    {"product_id": "X", "product_name": "Yacht", "price": 1e28, "quantity": 100},
    {"product_id": "P2", "product_name": "Mug", "price": 4.5, "quantity": 2}
  ]"#;
  let storage = MemoryStorage::new().with_entry(CART_KEY, stored);
  let store = CartStore::open(Arc::new(storage)).await;

  let ids: Vec<String> = store.lines().into_iter().map(|l| l.product_id).collect();
  assert_eq!(ids, vec!["P2"]);
  assert_eq!(store.totals().subtotal, dec("9"));
}

#[tokio::test]
#[serial]
async fn test_persisted_line_with_negative_price_is_dropped() {
  setup_tracing();
  let stored = r#"[
    {"product_id": "N", "product_name": "Refund", "price": -20, "quantity": 1},
    {"product_id": "P1", "product_name": "Lamp", "price": 10, "quantity": 1}
  ]"#;
  let storage = MemoryStorage::new().with_entry(CART_KEY, stored);
  let store = CartStore::open(Arc::new(storage)).await;

  assert_eq!(store.line_count(), 1);
  assert_eq!(store.lines()[0].product_id, "P1");
  assert_eq!(store.totals().subtotal, dec("10"));
}

#[tokio::test]
#[serial]
async fn test_failed_write_keeps_in_memory_state() {
  setup_tracing();
  let flaky = FlakyStorage::default();
  let store = CartStore::open(Arc::new(flaky.clone())).await;
  let mut events = store.subscribe();

  flaky.fail_writes(true);
  let line = store.add(&product("P1", "10"), 2).await;

  assert_eq!(line.quantity, 2);
  assert_eq!(store.item_count(), 2);
  assert_eq!(flaky.writes.load(std::sync::atomic::Ordering::SeqCst), 1);
  assert!(flaky.inner.raw(CART_KEY).is_none());
  // Still notified: the cart did change.
  assert_eq!(events.recv().await.unwrap().item_count, 2);
}

#[tokio::test]
#[serial]
async fn test_clear_deletes_storage_key() {
  setup_tracing();
  let (store, storage) = fresh_store().await;
  store.add(&product("P1", "10"), 1).await;
  assert!(storage.raw(CART_KEY).is_some());

  store.clear().await;

  assert!(store.is_empty());
  assert!(storage.raw(CART_KEY).is_none());
  assert_eq!(store.totals().total, dec("0"));
}

#[tokio::test]
#[serial]
async fn test_concurrent_adds_are_serialized() {
  setup_tracing();
  let (store, storage) = fresh_store().await;
  let p = product("P1", "1");

  let mut handles = Vec::new();
  for _ in 0..20 {
    let store = store.clone();
    let p = p.clone();
    handles.push(tokio::spawn(async move { store.add(&p, 1).await }));
  }
  for h in handles {
    h.await.unwrap();
  }

  assert_eq!(store.line_count(), 1);
  assert_eq!(store.item_count(), 20);
  let persisted: Vec<CartLineItem> = serde_json::from_str(&storage.raw(CART_KEY).unwrap()).unwrap();
  assert_eq!(persisted[0].quantity, 20);
}

#[tokio::test]
#[serial]
async fn test_other_tab_write_triggers_reread() {
  setup_tracing();
  let storage = MemoryStorage::new();
  let tab_a = CartStore::open(Arc::new(storage.clone())).await;
  let tab_b = CartStore::open(Arc::new(storage.clone())).await;
  let mut b_events = tab_b.subscribe();
  let _listener = tab_b.spawn_storage_listener().unwrap();

  tab_a.add(&product("P1", "10"), 2).await;

  let event = tokio::time::timeout(Duration::from_secs(2), b_events.recv())
    .await
    .expect("tab B should resync")
    .unwrap();
  assert_eq!(event.change, CartChange::Resynced);
  assert_eq!(event.item_count, 2);
  assert_eq!(tab_b.lines(), tab_a.lines());
}

#[tokio::test]
#[serial]
async fn test_own_write_echo_is_ignored() {
  setup_tracing();
  let storage = MemoryStorage::new();
  let store = CartStore::open(Arc::new(storage.clone())).await;
  store.add(&product("P1", "10"), 1).await;

  let echo = StorageEvent {
    key: CART_KEY.to_string(),
    new_value: storage.raw(CART_KEY),
  };
  assert!(!store.handle_storage_event(&echo).await);

  let unrelated = StorageEvent {
    key: "session_id".to_string(),
    new_value: Some("session-1".to_string()),
  };
  assert!(!store.handle_storage_event(&unrelated).await);
}

#[tokio::test]
#[serial]
async fn test_foreign_clear_is_picked_up() {
  setup_tracing();
  let storage = MemoryStorage::new();
  let store = CartStore::open(Arc::new(storage.clone())).await;
  store.add(&product("P1", "10"), 1).await;

  storage.remove(CART_KEY).await.unwrap();
  let changed = store
    .handle_storage_event(&StorageEvent {
      key: CART_KEY.to_string(),
      new_value: None,
    })
    .await;

  assert!(changed);
  assert!(store.is_empty());
}

#[tokio::test]
#[serial]
async fn test_reload_without_changes_is_silent() {
  setup_tracing();
  let (store, _) = fresh_store().await;
  store.add(&product("P1", "10"), 1).await;
  let mut events = store.subscribe();

  assert!(!store.reload().await);
  assert!(events.try_recv().is_err());
}

#[tokio::test]
#[serial]
async fn test_badge_follows_item_count() {
  setup_tracing();
  let (store, _) = fresh_store().await;
  store.add(&product("P1", "10"), 1).await;

  let mut badge = CartBadge::attach(&store);
  assert_eq!(badge.count(), 1);

  store.add(&product("P2", "5"), 3).await;
  let next = tokio::time::timeout(Duration::from_secs(2), badge.changed())
    .await
    .expect("badge should update");
  assert_eq!(next, Some(4));
  assert_eq!(badge.count(), 4);
}
