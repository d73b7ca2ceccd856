use std::collections::HashMap;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{error, warn};

use super::domain::LeaveRecord;

/// Key holding the JSON array of leave records.
pub const LEAVE_STORAGE_KEY: &str = "leaveApplications";
/// Reserved for user accounts. Nothing in the crate writes to it.
pub const USERS_STORAGE_KEY: &str = "users";

/// Minimal string key-value substrate the leave store is persisted into.
pub trait BlobStore: Send + Sync + 'static {
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, BlobStoreError>> + Send;

    fn set(
        &self,
        key: &str,
        value: String,
    ) -> impl Future<Output = Result<(), BlobStoreError>> + Send;
}

#[derive(Debug, thiserror::Error)]
pub enum BlobStoreError {
    #[error("blob io failure for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("blob store unavailable: {0}")]
    Unavailable(String),
}

/// Process-local blob store. Clones share the same map.
#[derive(Debug, Default, Clone)]
pub struct MemoryBlobStore {
    blobs: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryBlobStore {
    pub fn with_blob(key: &str, value: impl Into<String>) -> Self {
        let store = Self::default();
        store
            .blobs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.into());
        store
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.blobs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }
}

impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> Result<Option<String>, BlobStoreError> {
        let guard = self
            .blobs
            .lock()
            .map_err(|_| BlobStoreError::Unavailable("blob mutex poisoned".to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), BlobStoreError> {
        let mut guard = self
            .blobs
            .lock()
            .map_err(|_| BlobStoreError::Unavailable("blob mutex poisoned".to_string()))?;
        guard.insert(key.to_string(), value);
        Ok(())
    }
}

/// Stores each key as `<root>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    root: PathBuf,
}

impl FileBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl BlobStore for FileBlobStore {
    async fn get(&self, key: &str) -> Result<Option<String>, BlobStoreError> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(BlobStoreError::Io { path, source }),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), BlobStoreError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| BlobStoreError::Io {
                path: self.root.clone(),
                source,
            })?;

        // Stage next to the target, then rename over it.
        let path = self.path_for(key);
        let staging = self.root.join(format!(".{key}.json.tmp"));
        tokio::fs::write(&staging, value)
            .await
            .map_err(|source| BlobStoreError::Io {
                path: staging.clone(),
                source,
            })?;
        tokio::fs::rename(&staging, &path)
            .await
            .map_err(|source| BlobStoreError::Io { path, source })
    }
}

/// Persisted data that could not be turned back into leave records.
#[derive(Debug, thiserror::Error)]
pub enum StoreCorruptionError {
    #[error("leave data unreadable: {0}")]
    Read(#[from] BlobStoreError),
    #[error("leave data malformed: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Whole-sequence persistence for leave records on top of a [`BlobStore`].
///
/// Both directions fail soft: unreadable data loads as an empty sequence and a failed write is
/// logged and dropped.
pub struct LeaveStore<B> {
    blobs: Arc<B>,
}

impl<B> Clone for LeaveStore<B> {
    fn clone(&self) -> Self {
        Self {
            blobs: Arc::clone(&self.blobs),
        }
    }
}

impl<B: BlobStore> LeaveStore<B> {
    pub fn new(blobs: Arc<B>) -> Self {
        Self { blobs }
    }

    pub fn blobs(&self) -> &Arc<B> {
        &self.blobs
    }

    pub async fn load(&self) -> Vec<LeaveRecord> {
        match self.try_load().await {
            Ok(records) => records,
            Err(err) => {
                warn!(error = %err, key = LEAVE_STORAGE_KEY, "discarding unreadable leave data");
                Vec::new()
            }
        }
    }

    pub async fn save(&self, records: &[LeaveRecord]) {
        let payload = match serde_json::to_string(records) {
            Ok(payload) => payload,
            Err(err) => {
                error!(error = %err, "failed to encode leave records");
                return;
            }
        };

        if let Err(err) = self.blobs.set(LEAVE_STORAGE_KEY, payload).await {
            error!(error = %err, records = records.len(), "failed to persist leave records");
        }
    }

    async fn try_load(&self) -> Result<Vec<LeaveRecord>, StoreCorruptionError> {
        match self.blobs.get(LEAVE_STORAGE_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }
}
