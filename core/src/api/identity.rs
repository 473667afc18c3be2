// shopfront/src/api/identity.rs
use async_trait::async_trait;

/// What the managed identity provider hands us for a signed-in shopper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
  /// Sent as the bearer token. An empty token is not sent.
  pub id_token: String,
  pub user_id: Option<String>,
}

impl AuthSession {
  pub fn new(id_token: impl Into<String>, user_id: Option<String>) -> Self {
    Self {
      id_token: id_token.into(),
      user_id,
    }
  }

  pub(crate) fn bearer(&self) -> Option<&str> {
    let token = self.id_token.trim();
    (!token.is_empty()).then_some(token)
  }
}

/// Source of the current session. Sign-in itself happens elsewhere.
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
  async fn current_session(&self) -> Option<AuthSession>;

  async fn current_user_id(&self) -> Option<String> {
    self.current_session().await.and_then(|s| s.user_id)
  }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousIdentity;

#[async_trait]
impl IdentityProvider for AnonymousIdentity {
  async fn current_session(&self) -> Option<AuthSession> {
    None
  }
}

/// Fixed session, e.g. a token passed in through the environment.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
  session: AuthSession,
}

impl StaticIdentity {
  pub fn new(session: AuthSession) -> Self {
    Self { session }
  }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
  async fn current_session(&self) -> Option<AuthSession> {
    Some(self.session.clone())
  }
}
