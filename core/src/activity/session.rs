// shopfront/src/activity/session.rs
use crate::storage::{KeyValueStorage, SESSION_KEY};
use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

const SESSION_SUFFIX_LEN: usize = 9;

/// `session-<unix millis>-<9 random chars>`
pub fn generate_session_id() -> String {
  let suffix: String = Uuid::new_v4().simple().to_string().chars().take(SESSION_SUFFIX_LEN).collect();
  format!("session-{}-{}", Utc::now().timestamp_millis(), suffix)
}

/// Returns the persisted anonymous session id, creating and storing one on
/// first use. Storage trouble only costs persistence; an id is always returned.
pub async fn load_or_create_session_id(storage: &dyn KeyValueStorage) -> String {
  match storage.get(SESSION_KEY).await {
    Ok(Some(existing)) if !existing.trim().is_empty() => return existing,
    Ok(_) => {}
    Err(e) => warn!(error = %e, "Could not read session id; generating a new one."),
  }

  let fresh = generate_session_id();
  if let Err(e) = storage.set(SESSION_KEY, &fresh).await {
    warn!(error = %e, "Could not persist session id; it will not survive a restart.");
  } else {
    debug!(session_id = %fresh, "Created anonymous session.");
  }
  fresh
}
