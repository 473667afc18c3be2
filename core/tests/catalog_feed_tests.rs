// tests/catalog_feed_tests.rs
mod common;

use common::*;
use serial_test::serial;
use shopfront::{CatalogRequest, FeedUpdate, ProductFeed, ProductQuery, SortKey, StorefrontError};
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[test]
fn test_query_params_skip_blank_values_and_all_category() {
  let query = ProductQuery::text("  ")
    .with_category("all")
    .with_price_range(Some(dec("10.50")), None)
    .sorted_by(SortKey::PriceDesc)
    .page(2, 24);

  let params = query.to_params();
  assert_eq!(
    params,
    vec![
      ("min_price", "10.5".to_string()),
      ("sort_by", "price_desc".to_string()),
      ("page", "2".to_string()),
      ("limit", "24".to_string()),
    ]
  );
}

#[test]
fn test_query_params_include_text_and_category() {
  let params = ProductQuery::text("lamp").with_category("Home").to_params();
  assert!(params.contains(&("q", "lamp".to_string())));
  assert!(params.contains(&("category", "Home".to_string())));
  assert!(params.contains(&("sort_by", "popularity".to_string())));
}

#[test]
fn test_sort_key_parses_wire_names() {
  assert_eq!("price_asc".parse::<SortKey>().unwrap(), SortKey::PriceAsc);
  assert_eq!("newest".parse::<SortKey>().unwrap(), SortKey::Newest);
  assert!(matches!(
    "cheapest".parse::<SortKey>(),
    Err(StorefrontError::Validation(_))
  ));
}

#[tokio::test]
#[serial]
async fn test_load_populates_state() {
  setup_tracing();
  let catalog = Arc::new(FakeCatalog::new().with_results("lamp", vec![product("L1", "20"), product("L2", "30")]));
  let feed = ProductFeed::new(catalog);

  let update = feed.load(CatalogRequest::Search(ProductQuery::text("lamp"))).await;

  assert_eq!(update, FeedUpdate::Loaded { count: 2 });
  let state = feed.state();
  assert!(!state.loading);
  assert_eq!(state.error, None);
  assert_eq!(state.items.len(), 2);
}

#[tokio::test]
#[serial]
async fn test_set_query_only_reissues_on_value_change() {
  setup_tracing();
  let catalog = Arc::new(FakeCatalog::new().with_results("lamp", vec![product("L1", "20")]));
  let feed = ProductFeed::new(catalog.clone());

  assert!(feed.set_query(ProductQuery::text("lamp")).await.is_some());
  // A new but equal value is the same request.
  assert!(feed.set_query(ProductQuery::text("lamp")).await.is_none());
  assert_eq!(catalog.calls(), 1);

  assert!(feed
    .set_query(ProductQuery::text("lamp").sorted_by(SortKey::Rating))
    .await
    .is_some());
  assert_eq!(catalog.calls(), 2);
}

#[tokio::test]
#[serial]
async fn test_queries_sending_the_same_params_are_not_reissued() {
  setup_tracing();
  let catalog = Arc::new(FakeCatalog::new());
  let feed = ProductFeed::new(catalog.clone());

  assert!(feed.set_query(ProductQuery::default()).await.is_some());
  assert!(feed.set_query(ProductQuery::text("   ")).await.is_none());
  assert!(feed
    .set_query(ProductQuery::default().with_category("All"))
    .await
    .is_none());
  assert!(feed.set_query(ProductQuery::text(" lamp ")).await.is_some());
  assert!(feed.set_query(ProductQuery::text("lamp")).await.is_none());
  assert_eq!(catalog.calls(), 2);
}

#[tokio::test]
#[serial]
async fn test_stale_response_never_overwrites_newer_request() {
  setup_tracing();
  let catalog = Arc::new(
    FakeCatalog::new()
      .with_results("old", vec![product("OLD", "1")])
      .with_results("new", vec![product("NEW-1", "1"), product("NEW-2", "1")]),
  );
  let release_old = catalog.hold("old");
  let feed = ProductFeed::new(catalog.clone());

  let slow_feed = feed.clone();
  let slow = tokio::spawn(async move { slow_feed.set_query(ProductQuery::text("old")).await });
  // Let the first request reach the source and block there.
  while catalog.calls() == 0 {
    tokio::task::yield_now().await;
  }

  let fast = feed.set_query(ProductQuery::text("new")).await;
  assert_eq!(fast, Some(FeedUpdate::Loaded { count: 2 }));

  release_old.send(()).unwrap();
  let slow = slow.await.unwrap();
  assert_eq!(slow, Some(FeedUpdate::Superseded));

  let state = feed.state();
  let ids: Vec<String> = state.items.into_iter().map(|p| p.product_id).collect();
  assert_eq!(ids, vec!["NEW-1", "NEW-2"]);
  assert!(!state.loading);
  assert_eq!(feed.current_request(), Some(CatalogRequest::Search(ProductQuery::text("new"))));
}

#[tokio::test]
#[serial]
async fn test_failure_lands_in_error_state() {
  setup_tracing();
  let catalog = Arc::new(FakeCatalog::new().with_results("lamp", vec![product("L1", "20")]));
  let feed = ProductFeed::new(catalog.clone());
  feed.set_query(ProductQuery::text("lamp")).await;

  catalog.failing.store(true, Ordering::SeqCst);
  let update = feed.refetch().await.unwrap();

  assert!(matches!(update, FeedUpdate::Failed { .. }));
  let state = feed.state();
  assert!(state.error.unwrap().contains("503"));
  assert!(!state.loading);
  // Previous results stay visible.
  assert_eq!(state.items.len(), 1);

  catalog.failing.store(false, Ordering::SeqCst);
  assert_eq!(feed.refetch().await, Some(FeedUpdate::Loaded { count: 1 }));
  assert_eq!(feed.state().error, None);
}

#[tokio::test]
#[serial]
async fn test_refetch_without_request_does_nothing() {
  setup_tracing();
  let feed = ProductFeed::new(Arc::new(FakeCatalog::new()));
  assert_eq!(feed.refetch().await, None);
}

#[tokio::test]
#[serial]
async fn test_featured_respects_limit() {
  setup_tracing();
  let featured = (0..20).map(|i| product(&format!("F{}", i), "5")).collect();
  let feed = ProductFeed::new(Arc::new(FakeCatalog::new().with_featured(featured)));

  let update = feed.load_featured(12).await;

  assert_eq!(update, FeedUpdate::Loaded { count: 12 });
  assert_eq!(feed.state().pagination, None);
}

#[tokio::test]
#[serial]
async fn test_fetch_product_surfaces_not_found() {
  setup_tracing();
  let feed = ProductFeed::new(Arc::new(FakeCatalog::new().with_product(product("P1", "10"))));

  assert_eq!(feed.fetch_product("P1").await.unwrap().product_id, "P1");
  assert!(matches!(
    feed.fetch_product("nope").await,
    Err(StorefrontError::NotFound(_))
  ));
}
