// storefront_cli/src/main.rs

mod cli;
mod render;

use crate::cli::{CartCommands, Cli, Commands, ConfigOverrides, SearchArgs};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use rust_decimal::Decimal;
use shopfront::{parse_quantity, CartLineItem, FeedUpdate, ProductQuery, SortKey, Storefront, StorefrontConfig};
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  let config = load_config(&cli.overrides)?;
  init_tracing(config.log_json);
  tracing::debug!(api_url = %config.api_url, data_dir = %config.data_dir.display(), "Configuration resolved.");

  let storefront = Storefront::open(config)
    .await
    .context("Failed to open the storefront")?;

  run(&storefront, cli.command, cli.json).await
}

fn load_config(overrides: &ConfigOverrides) -> Result<StorefrontConfig> {
  let mut config = StorefrontConfig::from_env().context("Invalid storefront configuration")?;
  if let Some(api_url) = &overrides.api_url {
    config.api_url = api_url.clone();
  }
  if let Some(data_dir) = &overrides.data_dir {
    config.data_dir = data_dir.clone();
  }
  config.log_json |= overrides.json_logs;
  Ok(config)
}

fn init_tracing(json: bool) {
  // Logs go to stderr so command output stays pipeable.
  let builder = tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE)
    .with_writer(std::io::stderr);
  if json {
    builder.json().init();
  } else {
    builder.init();
  }
}

async fn run(storefront: &Storefront, command: Commands, as_json: bool) -> Result<()> {
  match command {
    Commands::Search(args) => {
      let query = build_query(args)?;
      let feed = storefront.catalog();
      if let Some(FeedUpdate::Failed { message }) = feed.set_query(query).await {
        return Err(anyhow!("Search failed: {}", message));
      }
      let state = feed.state();
      render::products(&state.items, state.pagination.as_ref(), as_json)
    }
    Commands::Featured { limit } => {
      let limit = limit.unwrap_or(storefront.config().featured_limit);
      let feed = storefront.catalog();
      if let FeedUpdate::Failed { message } = feed.load_featured(limit).await {
        return Err(anyhow!("Could not load featured products: {}", message));
      }
      render::products(&feed.state().items, None, as_json)
    }
    Commands::Product { product_id } => {
      let view = storefront.view_product(&product_id).await?;
      let (mut sections, personalized) = futures_util::future::join(
        storefront.product_recommendations(&view.product),
        storefront.personalized_recommendations(),
      )
      .await;
      sections.extend(personalized);
      render::product_detail(&view.product, &sections, as_json)
    }
    Commands::ForYou => {
      let section = storefront.personalized_recommendations().await;
      if section.is_none() && storefront.current_user_id().await.is_none() {
        tracing::info!("No user id configured; set STOREFRONT_USER_ID for personalized picks.");
      }
      render::section(section.as_ref(), as_json)
    }
    Commands::Cart { command } => run_cart(storefront, command, as_json).await,
    Commands::Checkout => {
      let receipt = storefront.checkout().await?;
      render::receipt(&receipt, as_json)
    }
  }
}

async fn run_cart(storefront: &Storefront, command: CartCommands, as_json: bool) -> Result<()> {
  let cart = storefront.cart();
  match command {
    CartCommands::Show => render::cart(&cart.lines(), &cart.totals(), as_json),
    CartCommands::Add { product_id, quantity } => {
      let product = storefront.catalog().fetch_product(&product_id).await?;
      let requested = i64::from(parse_quantity(&quantity));
      let line = storefront.add_to_cart(&product, requested).await?;
      render::line(&line, as_json)
    }
    CartCommands::Set { line, quantity } => {
      let target = resolve_line(storefront, &line)?;
      // A parsable 0 or negative removes the line; garbage means 1.
      let quantity = quantity
        .trim()
        .parse::<i64>()
        .unwrap_or_else(|_| i64::from(parse_quantity(&quantity)));
      match cart.set_quantity(&target.id, quantity).await {
        Some(updated) => render::line(&updated, as_json),
        None => render::message(&format!("Removed {} from the cart.", target.product_name), as_json),
      }
    }
    CartCommands::Remove { line } => {
      let target = resolve_line(storefront, &line)?;
      cart.remove(&target.id).await;
      render::message(&format!("Removed {} from the cart.", target.product_name), as_json)
    }
    CartCommands::Clear => {
      cart.clear().await;
      render::message("Cart cleared.", as_json)
    }
  }
}

fn resolve_line(storefront: &Storefront, id: &str) -> Result<CartLineItem> {
  let cart = storefront.cart();
  cart
    .line(id)
    .or_else(|| cart.line_for_product(id))
    .ok_or_else(|| anyhow!("No cart line or product '{}' in the cart", id))
}

fn build_query(args: SearchArgs) -> Result<ProductQuery> {
  let sort = SortKey::from_str(&args.sort)?;
  let min_price = parse_price(args.min_price.as_deref(), "--min-price")?;
  let max_price = parse_price(args.max_price.as_deref(), "--max-price")?;

  let mut query = ProductQuery::default();
  if let Some(text) = args.query {
    query = ProductQuery::text(text);
  }
  if let Some(category) = args.category {
    query = query.with_category(category);
  }
  Ok(
    query
      .with_price_range(min_price, max_price)
      .sorted_by(sort)
      .page(args.page, args.limit),
  )
}

fn parse_price(raw: Option<&str>, flag: &str) -> Result<Option<Decimal>> {
  raw
    .map(|value| Decimal::from_str(value.trim()).with_context(|| format!("{} must be a number", flag)))
    .transpose()
}
