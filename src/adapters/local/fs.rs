use crate::ports::storage::{ObjectStore, StorageError};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

/// Object store on the local filesystem: `key` maps to `{root}/{key}`.
#[derive(Debug, Clone)]
pub struct FsAdapter {
    root: PathBuf,
    base_url: String,
}

impl FsAdapter {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(key);
        let valid = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if !valid {
            return Err(StorageError::UploadFailed(format!("invalid key {key}")));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for FsAdapter {
    async fn put_file(
        &self,
        local_path: &Path,
        key: &str,
        _content_type: &str,
    ) -> Result<(), StorageError> {
        let key_path = self.resolve(key)?;
        if let Some(parent) = key_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
        }

        let mut source = tokio::fs::File::open(local_path)
            .await
            .map_err(|source| StorageError::Read {
                path: local_path.display().to_string(),
                source,
            })?;
        let mut target = tokio::fs::File::create(&key_path)
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
        let copied = tokio::io::copy(&mut source, &mut target)
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        tracing::info!(path = %key_path.display(), size_bytes = copied, "stored object on disk");
        Ok(())
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}
