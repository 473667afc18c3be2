use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_decimal::Decimal;
use shopfront::flows::{add_to_cart_workflow, run_add_to_cart, AddToCartCtx};
use shopfront::{
  ActivityEvent, ActivityLogger, ActivitySink, AnonymousIdentity, CartLineItem, CartStore, CartTotals, MemoryStorage,
  Product, Result,
};
use std::sync::Arc;
use tokio::runtime::Runtime; // To run async code within Criterion

// Accepts everything; keeps the benchmark on the cart path.
struct NullSink;

#[async_trait::async_trait]
impl ActivitySink for NullSink {
  async fn record(&self, _event: &ActivityEvent) -> Result<()> {
    Ok(())
  }
}

fn catalog(n: usize) -> Vec<Product> {
  (0..n)
    .map(|i| Product::new(format!("P{}", i), format!("Product {}", i), Decimal::new(1999 + i as i64, 2)))
    .collect()
}

fn bench_cart_add(c: &mut Criterion) {
  let mut group = c.benchmark_group("CartStoreAdd");
  let rt = Runtime::new().unwrap();

  for distinct in [1usize, 10, 50].iter() {
    let products = catalog(*distinct);
    group.throughput(Throughput::Elements(*distinct as u64));
    group.bench_with_input(BenchmarkId::from_parameter(distinct), &products, |b, products| {
      b.to_async(&rt).iter(|| async {
        let cart = CartStore::open(Arc::new(MemoryStorage::new())).await;
        for product in products {
          cart.add(product, 1).await;
        }
        cart.item_count()
      });
    });
  }
  group.finish();
}

fn bench_totals(c: &mut Criterion) {
  let mut group = c.benchmark_group("CartTotals");

  for lines in [1usize, 20, 200].iter() {
    let items: Vec<CartLineItem> = catalog(*lines).iter().map(|p| CartLineItem::snapshot(p, 3)).collect();
    group.bench_with_input(BenchmarkId::from_parameter(lines), &items, |b, items| {
      b.iter(|| CartTotals::from_lines(items));
    });
  }
  group.finish();
}

fn bench_add_to_cart_workflow(c: &mut Criterion) {
  let rt = Runtime::new().unwrap();
  let workflow = add_to_cart_workflow();
  let product = Product::new("P1", "Benchmark Lamp", Decimal::new(2499, 2));

  c.bench_function("AddToCartWorkflow", |b| {
    b.to_async(&rt).iter(|| async {
      let storage = Arc::new(MemoryStorage::new());
      let cart = CartStore::open(storage.clone()).await;
      let activity = ActivityLogger::new(Arc::new(NullSink), Arc::new(AnonymousIdentity), storage);
      let ctx = AddToCartCtx::new(cart, activity, product.clone(), 2);
      run_add_to_cart(&workflow, ctx).await.unwrap()
    });
  });
}

criterion_group!(benches, bench_cart_add, bench_totals, bench_add_to_cart_workflow);
criterion_main!(benches);
