use super::receiver::{accept_media_type, stage_upload, ReceiveError};
use crate::config::IngestConfig;
use crate::domain::{RemuxedAsset, ShapeCategory, StagedUpload, StorageKey, VideoRecord};
use crate::error::IngestError;
use crate::ports::media::{MediaError, MediaToolkit};
use crate::ports::repository::VideoRepository;
use crate::ports::storage::ObjectStore;
use bytes::Bytes;
use chrono::Utc;
use futures::Stream;
use std::time::Instant;
use uuid::Uuid;

/// Drives one upload through receive, classify, remux and publish, then
/// points the video record at the published object.
pub struct IngestService<M, S, R> {
    media: M,
    storage: S,
    repo: R,
    config: IngestConfig,
}

impl<M, S, R> IngestService<M, S, R>
where
    M: MediaToolkit,
    S: ObjectStore,
    R: VideoRepository,
{
    pub fn new(media: M, storage: S, repo: R, config: IngestConfig) -> Self {
        Self {
            media,
            storage,
            repo,
            config,
        }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Load the record and check `user_id` owns it. Runs before any of the
    /// body is read.
    pub async fn authorize(
        &self,
        video_id: Uuid,
        user_id: Uuid,
    ) -> Result<VideoRecord, IngestError> {
        let video = self
            .repo
            .get_video(video_id)
            .await
            .map_err(IngestError::RecordLookup)?
            .ok_or(IngestError::VideoNotFound(video_id))?;
        if !video.is_owned_by(user_id) {
            tracing::warn!(%video_id, %user_id, "upload rejected: not the owner");
            return Err(IngestError::NotOwner);
        }
        Ok(video)
    }

    /// Run the pipeline for `video`. Every local file created along the way
    /// is gone by the time this returns, whatever the outcome.
    pub async fn ingest<B>(
        &self,
        mut video: VideoRecord,
        declared_type: Option<&str>,
        body: B,
    ) -> Result<VideoRecord, IngestError>
    where
        B: Stream<Item = Result<Bytes, ReceiveError>>,
    {
        let start = Instant::now();
        let media_type = accept_media_type(declared_type)?;
        let staged = stage_upload(body, media_type, &self.config).await?;
        tracing::info!(video_id = %video.id, size_bytes = staged.len(), "upload received");

        let shape = self.classify(&staged).await?;
        let key = StorageKey::generate(shape, staged.media_type());

        let remuxed = self
            .media
            .remux(staged.path())
            .await
            .map_err(IngestError::Remux)?;
        let url = self.publish(&remuxed, &key, staged.media_type()).await?;
        drop(remuxed);
        drop(staged);

        video.video_url = Some(url);
        video.updated_at = Utc::now();
        self.repo
            .update_video(&video)
            .await
            .map_err(IngestError::RecordUpdate)?;

        tracing::info!(
            video_id = %video.id,
            key = %key,
            shape = %shape,
            duration_ms = start.elapsed().as_millis() as u64,
            "video ingested"
        );
        Ok(video)
    }

    async fn classify(&self, staged: &StagedUpload) -> Result<ShapeCategory, IngestError> {
        let probe = self
            .media
            .probe(staged.path())
            .await
            .map_err(IngestError::Classification)?;
        let shape = probe
            .shape()
            .ok_or(IngestError::Classification(MediaError::NoStreams))?;
        tracing::debug!(%shape, folder = shape.folder(), "classified upload");
        Ok(shape)
    }

    async fn publish(
        &self,
        asset: &RemuxedAsset,
        key: &StorageKey,
        media_type: &str,
    ) -> Result<String, IngestError> {
        self.storage
            .put_file(asset.path(), key.as_str(), media_type)
            .await
            .map_err(IngestError::Upload)?;
        Ok(self.storage.object_url(key.as_str()))
    }
}
