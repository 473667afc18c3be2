// shopfront/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorefrontError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("API Error ({status}): {body}")]
  Api { status: u16, body: String },

  #[error("HTTP transport error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("Malformed JSON payload: {0}")]
  Decode(#[from] serde_json::Error),

  #[error("Storage error for key '{key}': {message}")]
  Storage { key: String, message: String },

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Step '{step_name}' failed: {source}")]
  StepFailed {
    step_name: String,
    #[source]
    source: Box<StorefrontError>,
  },

  #[error("Internal error: {0}")]
  Internal(String),
}

impl StorefrontError {
  pub fn storage(key: &str, message: impl std::fmt::Display) -> Self {
    StorefrontError::Storage {
      key: key.to_string(),
      message: message.to_string(),
    }
  }

  /// Strips `StepFailed` wrappers added by the workflow runner.
  pub fn root_cause(&self) -> &StorefrontError {
    match self {
      StorefrontError::StepFailed { source, .. } => source.root_cause(),
      other => other,
    }
  }

  pub fn into_root_cause(self) -> StorefrontError {
    match self {
      StorefrontError::StepFailed { source, .. } => source.into_root_cause(),
      other => other,
    }
  }
}

// Handlers written against anyhow can still use `?` inside storefront code.
impl From<AnyhowError> for StorefrontError {
  fn from(err: AnyhowError) -> Self {
    match err.downcast::<StorefrontError>() {
      Ok(inner) => inner,
      Err(other) => StorefrontError::Internal(other.to_string()),
    }
  }
}

pub type Result<T, E = StorefrontError> = std::result::Result<T, E>;
