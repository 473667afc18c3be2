// shopfront/src/config.rs

use crate::activity::DEFAULT_REPORT_BUDGET;
use crate::catalog::DEFAULT_FEATURED_LIMIT;
use crate::error::{Result, StorefrontError};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_DATA_DIR: &str = ".storefront";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
  pub api_url: String,
  /// Where the cart and session id are persisted.
  pub data_dir: PathBuf,
  pub id_token: Option<String>,
  pub user_id: Option<String>,
  /// `None` waits as long as the gateway takes.
  pub request_timeout: Option<Duration>,
  /// Longest a flow waits on an activity report.
  pub activity_budget: Duration,
  pub featured_limit: u32,
  pub log_json: bool,
}

impl Default for StorefrontConfig {
  fn default() -> Self {
    Self {
      api_url: DEFAULT_API_URL.to_string(),
      data_dir: PathBuf::from(DEFAULT_DATA_DIR),
      id_token: None,
      user_id: None,
      request_timeout: None,
      activity_budget: DEFAULT_REPORT_BUDGET,
      featured_limit: DEFAULT_FEATURED_LIMIT,
      log_json: false,
    }
  }
}

impl StorefrontConfig {
  /// Reads `STOREFRONT_*` variables, loading `.env` first if present.
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Same as `from_env` with a custom variable source.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let api_url = get("STOREFRONT_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
    if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
      return Err(StorefrontError::Config(format!(
        "Invalid STOREFRONT_API_URL '{}': expected an http(s) URL",
        api_url
      )));
    }

    let data_dir = get("STOREFRONT_DATA_DIR")
      .map(PathBuf::from)
      .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

    let request_timeout = get("STOREFRONT_REQUEST_TIMEOUT_SECS")
      .map(|raw| {
        raw
          .parse::<u64>()
          .map_err(|e| StorefrontError::Config(format!("Invalid STOREFRONT_REQUEST_TIMEOUT_SECS: {}", e)))
      })
      .transpose()?
      .filter(|secs| *secs > 0)
      .map(Duration::from_secs);

    let activity_budget = get("STOREFRONT_ACTIVITY_BUDGET_MS")
      .map(|raw| {
        raw
          .parse::<u64>()
          .map_err(|e| StorefrontError::Config(format!("Invalid STOREFRONT_ACTIVITY_BUDGET_MS: {}", e)))
      })
      .transpose()?
      .map(Duration::from_millis)
      .unwrap_or(DEFAULT_REPORT_BUDGET);

    let featured_limit = get("STOREFRONT_FEATURED_LIMIT")
      .map(|raw| {
        raw
          .parse::<u32>()
          .map_err(|e| StorefrontError::Config(format!("Invalid STOREFRONT_FEATURED_LIMIT: {}", e)))
      })
      .transpose()?
      .unwrap_or(DEFAULT_FEATURED_LIMIT);

    let log_json = get("STOREFRONT_LOG_JSON")
      .map(|raw| {
        raw
          .parse::<bool>()
          .map_err(|e| StorefrontError::Config(format!("Invalid STOREFRONT_LOG_JSON value: {}", e)))
      })
      .transpose()?
      .unwrap_or(false);

    tracing::info!("Storefront configuration loaded.");

    Ok(Self {
      api_url,
      data_dir,
      id_token: get("STOREFRONT_ID_TOKEN"),
      user_id: get("STOREFRONT_USER_ID"),
      request_timeout,
      activity_budget,
      featured_limit,
      log_json,
    })
  }
}
