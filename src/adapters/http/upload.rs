use super::AppState;
use crate::application::ReceiveError;
use crate::domain::VideoRecord;
use crate::error::IngestError;
use crate::ports::{MediaToolkit, ObjectStore, VideoRepository};
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use futures::TryStreamExt;
use uuid::Uuid;

/// Multipart field carrying the video file.
pub const VIDEO_FIELD: &str = "video";

/// `POST /api/video_upload/:video_id`
///
/// The caller is authenticated and checked against the record's owner before
/// any of the body is read.
pub async fn upload_video<M, S, R>(
    State(state): State<AppState<M, S, R>>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<VideoRecord>, IngestError>
where
    M: MediaToolkit + 'static,
    S: ObjectStore + 'static,
    R: VideoRepository + 'static,
{
    let video_id = Uuid::parse_str(&video_id).map_err(IngestError::InvalidVideoId)?;
    let token = bearer_token(&headers).ok_or(IngestError::MissingCredentials)?;
    let user_id = state
        .tokens
        .validate(token)
        .map_err(IngestError::InvalidCredentials)?;
    let video = state.ingest.authorize(video_id, user_id).await?;

    tracing::info!(%video_id, %user_id, "uploading video");

    let limit = state.ingest.config().max_upload_bytes;
    let mut multipart = multipart.map_err(|e| IngestError::Malformed(e.body_text()))?;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }
        let content_type = field.content_type().map(str::to_owned);
        let body = field.map_err(receive_error);
        let video = state
            .ingest
            .ingest(video, content_type.as_deref(), body)
            .await?;
        return Ok(Json(video));
    }

    Err(IngestError::MissingFile)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

fn multipart_error(err: MultipartError, limit: u64) -> IngestError {
    match receive_error(err) {
        ReceiveError::TooLarge => IngestError::TooLarge { limit },
        ReceiveError::Transport(message) => IngestError::Malformed(message),
    }
}

fn receive_error(err: MultipartError) -> ReceiveError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ReceiveError::TooLarge
    } else {
        ReceiveError::Transport(err.body_text())
    }
}
