// storefront_cli/src/cli.rs
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "Browse the catalog and manage a cart against the storefront gateway")]
#[command(version)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  #[command(flatten)]
  pub overrides: ConfigOverrides,

  /// Print results as JSON instead of text
  #[arg(long, global = true)]
  pub json: bool,
}

/// Flags that win over `STOREFRONT_*` variables.
#[derive(Args, Clone, Default)]
pub struct ConfigOverrides {
  /// Gateway base URL
  #[arg(long, global = true)]
  pub api_url: Option<String>,

  /// Directory holding the cart and session id
  #[arg(long, global = true)]
  pub data_dir: Option<PathBuf>,

  /// Emit logs as JSON lines
  #[arg(long, global = true)]
  pub json_logs: bool,
}

#[derive(Subcommand)]
pub enum Commands {
  /// Search the catalog
  Search(SearchArgs),
  /// List featured products
  Featured {
    /// How many products to show (defaults to STOREFRONT_FEATURED_LIMIT)
    #[arg(long)]
    limit: Option<u32>,
  },
  /// Show one product with its recommendation sections
  Product {
    product_id: String,
  },
  /// Show the "Recommended for You" section for the signed-in shopper
  ForYou,
  /// Cart commands
  Cart {
    #[command(subcommand)]
    command: CartCommands,
  },
  /// Place the order for everything in the cart
  Checkout,
}

#[derive(Args)]
pub struct SearchArgs {
  /// Free-text query
  pub query: Option<String>,

  /// Category filter ("all" for none)
  #[arg(long)]
  pub category: Option<String>,

  #[arg(long)]
  pub min_price: Option<String>,

  #[arg(long)]
  pub max_price: Option<String>,

  /// popularity, price_asc, price_desc, rating or newest
  #[arg(long, default_value = "popularity")]
  pub sort: String,

  #[arg(long, default_value_t = 1)]
  pub page: u32,

  #[arg(long, default_value_t = 20)]
  pub limit: u32,
}

#[derive(Subcommand)]
pub enum CartCommands {
  /// List cart lines and totals
  Show,
  /// Add a product; the quantity is coerced to at least 1
  Add {
    product_id: String,
    #[arg(default_value = "1")]
    quantity: String,
  },
  /// Change a line's quantity; 0 or less removes it
  Set {
    /// Line id or product id
    line: String,
    #[arg(allow_hyphen_values = true)]
    quantity: String,
  },
  /// Remove a line
  Remove {
    /// Line id or product id
    line: String,
  },
  /// Empty the cart
  Clear,
}
