use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("could not read {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("upload failed: {0}")]
    UploadFailed(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stream a local file to `key`. Each key is written once.
    async fn put_file(
        &self,
        local_path: &Path,
        key: &str,
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Resolvable URL of the object stored under `key`.
    fn object_url(&self, key: &str) -> String;
}
