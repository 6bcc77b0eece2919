use crate::domain::VideoRecord;
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("video {0} does not exist")]
    Missing(Uuid),
    #[error("record store error: {0}")]
    Backend(String),
    #[error("corrupt video record")]
    Serialization(#[from] serde_json::Error),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Fetch a video record, `None` if it does not exist
    async fn get_video(&self, id: Uuid) -> Result<Option<VideoRecord>, RepositoryError>;

    /// Replace an existing record
    async fn update_video(&self, video: &VideoRecord) -> Result<(), RepositoryError>;
}
