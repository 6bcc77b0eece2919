//! Upload receiver: validates the declared media type and spools the body to
//! a scoped temp file.

use crate::config::IngestConfig;
use crate::domain::StagedUpload;
use crate::error::IngestError;
use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use mime::Mime;
use std::io::{self, SeekFrom};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt, BufWriter};
use tokio_util::io::StreamReader;

pub const ACCEPTED_MEDIA_TYPE: &str = "video/mp4";

/// Why an inbound body stream stopped yielding chunks.
#[derive(Debug, Error)]
pub enum ReceiveError {
    #[error("body exceeds the configured limit")]
    TooLarge,
    #[error("{0}")]
    Transport(String),
}

/// Parse the declared Content-Type, drop its parameters and require exactly
/// `video/mp4`. Returns the normalised media type.
pub fn accept_media_type(declared: Option<&str>) -> Result<String, IngestError> {
    let parsed: Mime = declared
        .unwrap_or_default()
        .trim()
        .parse()
        .map_err(IngestError::InvalidContentType)?;
    let essence = parsed.essence_str().to_ascii_lowercase();
    if essence != ACCEPTED_MEDIA_TYPE {
        return Err(IngestError::UnsupportedMediaType(essence));
    }
    Ok(essence)
}

/// Copy `body` into a fresh temp file under `config.temp_dir`.
///
/// The temp file is removed when the returned [`StagedUpload`] drops, and
/// immediately if any step here fails.
pub async fn stage_upload<S>(
    body: S,
    media_type: String,
    config: &IngestConfig,
) -> Result<StagedUpload, IngestError>
where
    S: Stream<Item = Result<Bytes, ReceiveError>>,
{
    let limit = config.max_upload_bytes;
    let staged = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(".mp4")
        .tempfile_in(&config.temp_dir)
        .map_err(IngestError::Staging)?;
    let handle = staged.as_file().try_clone().map_err(IngestError::Staging)?;

    let body_with_io_error = body.map_err(io::Error::other);
    let body_reader = StreamReader::new(body_with_io_error);
    futures::pin_mut!(body_reader);
    // One byte past the limit is enough to tell an oversized body apart.
    let mut limited = body_reader.take(limit.saturating_add(1));

    let mut writer = BufWriter::new(tokio::fs::File::from_std(handle));
    let written = tokio::io::copy(&mut limited, &mut writer)
        .await
        .map_err(|err| receive_failure(err, limit))?;
    if written > limit {
        return Err(IngestError::TooLarge { limit });
    }
    writer.flush().await.map_err(IngestError::Staging)?;

    let mut file = writer.into_inner();
    file.seek(SeekFrom::Start(0))
        .await
        .map_err(IngestError::Staging)?;

    tracing::debug!(path = %staged.path().display(), size_bytes = written, "staged upload");
    Ok(StagedUpload::new(staged, written, media_type))
}

fn receive_failure(err: io::Error, limit: u64) -> IngestError {
    if err.get_ref().is_some_and(|inner| inner.is::<ReceiveError>()) {
        let inner = err.into_inner().map(|inner| inner.downcast::<ReceiveError>());
        return match inner {
            Some(Ok(received)) => match *received {
                ReceiveError::TooLarge => IngestError::TooLarge { limit },
                ReceiveError::Transport(message) => IngestError::Malformed(message),
            },
            _ => IngestError::Malformed("upload interrupted".to_string()),
        };
    }
    IngestError::Staging(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use std::path::PathBuf;

    fn config(dir: &tempfile::TempDir, max_upload_bytes: u64) -> IngestConfig {
        IngestConfig {
            temp_dir: dir.path().to_path_buf(),
            max_upload_bytes,
        }
    }

    fn body(chunks: &[&'static [u8]]) -> impl Stream<Item = Result<Bytes, ReceiveError>> {
        stream::iter(
            chunks
                .iter()
                .map(|chunk| Ok(Bytes::from_static(chunk)))
                .collect::<Vec<_>>(),
        )
    }

    fn entries(dir: &tempfile::TempDir) -> usize {
        std::fs::read_dir(dir.path()).unwrap().count()
    }

    #[test]
    fn test_accepts_mp4() {
        assert_eq!(accept_media_type(Some("video/mp4")).unwrap(), "video/mp4");
    }

    #[test]
    fn test_parameters_are_discarded() {
        assert_eq!(
            accept_media_type(Some("video/mp4; codecs=\"avc1.42E01E\"")).unwrap(),
            "video/mp4"
        );
        assert_eq!(accept_media_type(Some("Video/MP4")).unwrap(), "video/mp4");
    }

    #[test]
    fn test_rejects_other_media_types() {
        let err = accept_media_type(Some("video/quicktime")).unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedMediaType(ref t) if t == "video/quicktime"));
    }

    #[test]
    fn test_rejects_unparsable_or_missing_type() {
        assert!(matches!(
            accept_media_type(Some("not a media type")),
            Err(IngestError::InvalidContentType(_))
        ));
        assert!(matches!(
            accept_media_type(None),
            Err(IngestError::InvalidContentType(_))
        ));
    }

    #[tokio::test]
    async fn test_stage_upload() {
        let dir = tempfile::tempdir().unwrap();
        let staged = stage_upload(
            body(&[b"ftyp", b"isom", b"moov"]),
            "video/mp4".to_string(),
            &config(&dir, 1024),
        )
        .await
        .unwrap();

        assert_eq!(staged.len(), 12);
        assert_eq!(staged.media_type(), "video/mp4");
        assert!(staged.path().starts_with(dir.path()));
        assert_eq!(std::fs::read(staged.path()).unwrap(), b"ftypisommoov");

        let path: PathBuf = staged.path().to_path_buf();
        drop(staged);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_exact_limit_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let staged = stage_upload(body(&[b"12345678"]), "video/mp4".into(), &config(&dir, 8))
            .await
            .unwrap();
        assert_eq!(staged.len(), 8);
    }

    #[tokio::test]
    async fn test_too_large_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = stage_upload(
            body(&[b"12345678", b"9"]),
            "video/mp4".into(),
            &config(&dir, 8),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, IngestError::TooLarge { limit: 8 }));
        assert_eq!(entries(&dir), 0);
    }

    #[tokio::test]
    async fn test_limit_reported_by_transport() {
        let dir = tempfile::tempdir().unwrap();
        let chunks = stream::iter(vec![
            Ok(Bytes::from_static(b"1234")),
            Err(ReceiveError::TooLarge),
        ]);
        let err = stage_upload(chunks, "video/mp4".into(), &config(&dir, 1024))
            .await
            .unwrap_err();

        assert!(matches!(err, IngestError::TooLarge { limit: 1024 }));
        assert_eq!(entries(&dir), 0);
    }

    #[tokio::test]
    async fn test_interrupted_body() {
        let dir = tempfile::tempdir().unwrap();
        let chunks = stream::iter(vec![
            Ok(Bytes::from_static(b"1234")),
            Err(ReceiveError::Transport("connection reset".into())),
        ]);
        let err = stage_upload(chunks, "video/mp4".into(), &config(&dir, 1024))
            .await
            .unwrap_err();

        assert!(matches!(err, IngestError::Malformed(ref m) if m == "connection reset"));
        assert_eq!(entries(&dir), 0);
    }

    #[tokio::test]
    async fn test_missing_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = IngestConfig {
            temp_dir: dir.path().join("missing"),
            max_upload_bytes: 1024,
        };
        let err = stage_upload(body(&[b"1234"]), "video/mp4".into(), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::Staging(_)));
    }
}
