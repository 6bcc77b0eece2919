use crate::domain::VideoRecord;
use crate::ports::repository::{RepositoryError, VideoRepository};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local record store for development and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    videos: Arc<RwLock<HashMap<Uuid, VideoRecord>>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, video: VideoRecord) {
        self.videos.write().await.insert(video.id, video);
    }
}

#[async_trait]
impl VideoRepository for MemoryRepository {
    async fn get_video(&self, id: Uuid) -> Result<Option<VideoRecord>, RepositoryError> {
        Ok(self.videos.read().await.get(&id).cloned())
    }

    async fn update_video(&self, video: &VideoRecord) -> Result<(), RepositoryError> {
        let mut videos = self.videos.write().await;
        let stored = videos
            .get_mut(&video.id)
            .ok_or(RepositoryError::Missing(video.id))?;
        *stored = video.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_update_existing() {
        let repo = MemoryRepository::new();
        let mut video = VideoRecord::new(Uuid::new_v4(), Uuid::new_v4(), "boots");
        repo.insert(video.clone()).await;

        video.video_url = Some("https://example.com/landscape/a.mp4".into());
        repo.update_video(&video).await.unwrap();

        let stored = repo.get_video(video.id).await.unwrap().unwrap();
        assert_eq!(stored, video);
    }

    #[tokio::test]
    async fn test_update_missing() {
        let repo = MemoryRepository::new();
        let video = VideoRecord::new(Uuid::new_v4(), Uuid::new_v4(), "boots");
        let err = repo.update_video(&video).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Missing(id) if id == video.id));
        assert!(repo.get_video(video.id).await.unwrap().is_none());
    }
}
