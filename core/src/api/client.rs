// shopfront/src/api/client.rs
use crate::api::dto::{
  FeaturedEnvelope, PersonalizedBody, ProductEnvelope, RecommendationEnvelope, RecommendationRequest, SearchPage,
};
use crate::api::identity::{AnonymousIdentity, IdentityProvider};
use crate::api::{ActivitySink, ProductSource, RecommendationSource};
use crate::catalog::ProductQuery;
use crate::error::{Result, StorefrontError};
use crate::models::{ActivityEvent, Product};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// JSON client for the storefront gateway.
#[derive(Clone)]
pub struct ApiClient {
  http: reqwest::Client,
  // Kept as text: the gateway base usually carries a stage path (`/prod`)
  // that `Url::join` would drop.
  base_url: String,
  identity: Arc<dyn IdentityProvider>,
}

impl fmt::Debug for ApiClient {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ApiClient").field("base_url", &self.base_url).finish()
  }
}

impl ApiClient {
  pub fn new(base_url: &str, identity: Arc<dyn IdentityProvider>) -> Result<Self> {
    Self::with_timeout(base_url, identity, None)
  }

  pub fn anonymous(base_url: &str) -> Result<Self> {
    Self::new(base_url, Arc::new(AnonymousIdentity))
  }

  /// `timeout` of `None` means requests may take as long as the server does.
  pub fn with_timeout(
    base_url: &str,
    identity: Arc<dyn IdentityProvider>,
    timeout: Option<Duration>,
  ) -> Result<Self> {
    let trimmed = base_url.trim().trim_end_matches('/');
    Url::parse(trimmed).map_err(|e| StorefrontError::Config(format!("invalid API base URL '{}': {}", base_url, e)))?;

    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
      builder = builder.timeout(timeout);
    }
    let http = builder.build()?;

    Ok(Self {
      http,
      base_url: trimmed.to_string(),
      identity,
    })
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  fn url(&self, path: &str) -> Result<Url> {
    Url::parse(&format!("{}{}", self.base_url, path))
      .map_err(|e| StorefrontError::Internal(format!("failed to build API URL for '{}': {}", path, e)))
  }

  async fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
    match self.identity.current_session().await {
      Some(session) => match session.bearer() {
        Some(token) => req.bearer_auth(token),
        None => req,
      },
      None => req,
    }
  }

  async fn send(&self, req: RequestBuilder) -> Result<String> {
    let response = self.authorize(req).await.send().await?;
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if !status.is_success() {
      warn!(status = status.as_u16(), "API request failed.");
      return Err(StorefrontError::Api {
        status: status.as_u16(),
        body,
      });
    }
    Ok(body)
  }

  async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
    let body = self.send(req).await?;
    Ok(serde_json::from_str(&body)?)
  }

  #[instrument(name = "api::search", skip(self, query), err(Display))]
  pub async fn search(&self, query: &ProductQuery) -> Result<SearchPage> {
    let mut url = self.url("/search")?;
    url.query_pairs_mut().extend_pairs(query.to_params());
    debug!(%url, "Searching products.");
    self.send_json(self.http.get(url)).await
  }

  #[instrument(name = "api::get_product", skip(self), err(Display))]
  pub async fn get_product(&self, product_id: &str) -> Result<Product> {
    let mut url = self.url("/products")?;
    url
      .path_segments_mut()
      .map_err(|_| StorefrontError::Internal("API base URL cannot carry a path".to_string()))?
      .push(product_id);

    match self.send_json::<ProductEnvelope>(self.http.get(url)).await {
      Ok(envelope) => Ok(envelope.product),
      Err(StorefrontError::Api { status: 404, .. }) => {
        Err(StorefrontError::NotFound(format!("product '{}'", product_id)))
      }
      Err(e) => Err(e),
    }
  }

  #[instrument(name = "api::featured", skip(self), err(Display))]
  pub async fn featured(&self, limit: u32) -> Result<Vec<Product>> {
    let mut url = self.url("/featured")?;
    url.query_pairs_mut().append_pair("limit", &limit.to_string());
    let envelope: FeaturedEnvelope = self.send_json(self.http.get(url)).await?;
    Ok(envelope.products)
  }

  #[instrument(name = "api::recommendations", skip(self), err(Display))]
  pub async fn recommendations(&self, request: &RecommendationRequest) -> Result<Vec<Product>> {
    let req = match request {
      RecommendationRequest::ForProduct {
        product_id,
        kind,
        limit,
      } => {
        let mut url = self.url("/recommendations")?;
        url
          .query_pairs_mut()
          .append_pair("product_id", product_id)
          .append_pair("type", kind)
          .append_pair("limit", &limit.to_string());
        self.http.get(url)
      }
      RecommendationRequest::ForUser { user_id, kind, limit } => {
        let url = self.url("/recommendations")?;
        self.http.post(url).json(&PersonalizedBody {
          user_id,
          kind,
          limit: *limit,
        })
      }
    };
    let envelope: RecommendationEnvelope = self.send_json(req).await?;
    Ok(envelope.recommendations)
  }

  /// `POST /recommendations` for the signed-in shopper.
  pub async fn personalized_recommendations(&self, user_id: &str, limit: u32) -> Result<Vec<Product>> {
    self
      .recommendations(&RecommendationRequest::ForUser {
        user_id: user_id.to_string(),
        kind: "personalized",
        limit,
      })
      .await
  }

  /// The response body is not used.
  #[instrument(name = "api::record_activity", skip(self, event), fields(event_type = event.event_type.as_str()), err(Display))]
  pub async fn record_activity(&self, event: &ActivityEvent) -> Result<()> {
    let url = self.url("/activity")?;
    self.send(self.http.post(url).json(event)).await?;
    Ok(())
  }
}

#[async_trait]
impl ProductSource for ApiClient {
  async fn search(&self, query: &ProductQuery) -> Result<SearchPage> {
    ApiClient::search(self, query).await
  }

  async fn featured(&self, limit: u32) -> Result<Vec<Product>> {
    ApiClient::featured(self, limit).await
  }

  async fn product(&self, product_id: &str) -> Result<Product> {
    self.get_product(product_id).await
  }
}

#[async_trait]
impl RecommendationSource for ApiClient {
  async fn recommendations(&self, request: &RecommendationRequest) -> Result<Vec<Product>> {
    ApiClient::recommendations(self, request).await
  }
}

#[async_trait]
impl ActivitySink for ApiClient {
  async fn record(&self, event: &ActivityEvent) -> Result<()> {
    self.record_activity(event).await
  }
}
