//! Redis VideoRepository implementation.

use super::error::RedisStoreError;
use super::pool::RedisPool;
use super::VIDEO_PREFIX;
use crate::domain::VideoRecord;
use crate::ports::repository::{RepositoryError, VideoRepository};
use async_trait::async_trait;
use deadpool_redis::redis::AsyncCommands;
use uuid::Uuid;

fn video_key(id: Uuid) -> String {
    format!("{}{}", VIDEO_PREFIX, id)
}

#[async_trait]
impl VideoRepository for RedisPool {
    async fn get_video(&self, id: Uuid) -> Result<Option<VideoRecord>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(RedisStoreError::from)?;
        let json: Option<String> = conn
            .get(video_key(id))
            .await
            .map_err(RedisStoreError::from)?;
        match json {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }

    async fn update_video(&self, video: &VideoRecord) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(RedisStoreError::from)?;
        let json = serde_json::to_string(video)?;

        // XX: only overwrite a record that already exists
        let reply: Option<String> = deadpool_redis::redis::cmd("SET")
            .arg(video_key(video.id))
            .arg(json)
            .arg("XX")
            .query_async(&mut conn)
            .await
            .map_err(RedisStoreError::from)?;
        set_existing_reply(reply, video.id)
    }
}

/// `SET .. XX` replies nil when the key did not exist.
fn set_existing_reply(reply: Option<String>, id: Uuid) -> Result<(), RepositoryError> {
    match reply {
        Some(_) => Ok(()),
        None => Err(RepositoryError::Missing(id)),
    }
}
