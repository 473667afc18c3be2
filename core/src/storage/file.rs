// shopfront/src/storage/file.rs

use crate::error::{Result, StorefrontError};
use crate::storage::KeyValueStorage;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// One file per key under a data directory. Writes go to a sibling temp file
/// first and are renamed into place, so readers never see a half-written cart.
#[derive(Debug, Clone)]
pub struct FileStorage {
  root: PathBuf,
}

impl FileStorage {
  #[instrument(name = "FileStorage::open", skip_all, err(Display))]
  pub async fn open(root: impl AsRef<Path>) -> Result<Self> {
    let root = root.as_ref().to_path_buf();
    tokio::fs::create_dir_all(&root)
      .await
      .map_err(|e| StorefrontError::storage("<root>", format!("cannot create {}: {}", root.display(), e)))?;
    debug!(root = %root.display(), "File storage ready.");
    Ok(Self { root })
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  fn path_for(&self, key: &str) -> Result<PathBuf> {
    let valid = !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
      return Err(StorefrontError::storage(key, "keys may only contain [A-Za-z0-9_-]"));
    }
    Ok(self.root.join(format!("{}.json", key)))
  }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
  async fn get(&self, key: &str) -> Result<Option<String>> {
    let path = self.path_for(key)?;
    match tokio::fs::read_to_string(&path).await {
      Ok(contents) => Ok(Some(contents)),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
      Err(e) => Err(StorefrontError::storage(key, e)),
    }
  }

  async fn set(&self, key: &str, value: &str) -> Result<()> {
    let path = self.path_for(key)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, value.as_bytes())
      .await
      .map_err(|e| StorefrontError::storage(key, e))?;
    tokio::fs::rename(&tmp, &path)
      .await
      .map_err(|e| StorefrontError::storage(key, e))?;
    Ok(())
  }

  async fn remove(&self, key: &str) -> Result<()> {
    let path = self.path_for(key)?;
    match tokio::fs::remove_file(&path).await {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
      Err(e) => Err(StorefrontError::storage(key, e)),
    }
  }
}
