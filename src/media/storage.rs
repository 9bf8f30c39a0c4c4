use super::filename::numbered_candidate;
use crate::error::IngestionError;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

const MAX_NAME_ATTEMPTS: u32 = 10_000;

/// Outcome of an exclusive create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    AlreadyExists,
}

/// File side of media persistence. Names are single path components.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    async fn exists(&self, name: &str) -> Result<bool, IngestionError>;

    /// Create `name` exclusively; never overwrites.
    async fn write_new(&self, name: &str, data: &[u8]) -> Result<WriteOutcome, IngestionError>;

    async fn remove(&self, name: &str) -> Result<(), IngestionError>;

    fn url_for(&self, name: &str) -> String;
}

/// Persist under the first free name in the `name`, `name-1`, ... sequence.
pub async fn store_unique(
    storage: &dyn MediaStorage,
    name: &str,
    data: &[u8],
) -> Result<String, IngestionError> {
    for n in 0..MAX_NAME_ATTEMPTS {
        let candidate = numbered_candidate(name, n);
        if storage.exists(&candidate).await? {
            continue;
        }
        match storage.write_new(&candidate, data).await? {
            WriteOutcome::Created => return Ok(candidate),
            WriteOutcome::AlreadyExists => {
                tracing::debug!(filename = %candidate, "lost filename race, retrying");
            }
        }
    }
    Err(IngestionError::StorageWrite(format!(
        "no free filename for {name}"
    )))
}

/// Uploads directory on the local filesystem, served under `base_url`.
pub struct LocalMediaStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalMediaStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: &str) -> Result<Self, IngestionError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| {
            IngestionError::UploadDir(format!("{}: {e}", root.display()))
        })?;
        Ok(Self {
            root,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn exists(&self, name: &str) -> Result<bool, IngestionError> {
        tokio::fs::try_exists(self.path_for(name))
            .await
            .map_err(|e| IngestionError::StorageWrite(e.to_string()))
    }

    async fn write_new(&self, name: &str, data: &[u8]) -> Result<WriteOutcome, IngestionError> {
        let path = self.path_for(name);
        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Ok(WriteOutcome::AlreadyExists);
            }
            Err(e) => return Err(IngestionError::StorageWrite(e.to_string())),
        };

        let written = match file.write_all(data).await {
            Ok(()) => file.flush().await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            drop(file);
            let _ = tokio::fs::remove_file(&path).await;
            return Err(IngestionError::StorageWrite(e.to_string()));
        }
        Ok(WriteOutcome::Created)
    }

    async fn remove(&self, name: &str) -> Result<(), IngestionError> {
        match tokio::fs::remove_file(self.path_for(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(IngestionError::StorageWrite(e.to_string())),
        }
    }

    fn url_for(&self, name: &str) -> String {
        format!("{}/{name}", self.base_url)
    }
}
