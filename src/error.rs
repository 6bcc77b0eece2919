//! Errors surfaced by the ingest pipeline.
//!
//! `Display` is the caller-visible message. The underlying cause stays in
//! `source()` and is only written to logs.

use crate::ports::{AuthError, MediaError, RepositoryError, StorageError};
use std::io;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ClientInput,
    Unauthorized,
    ServerSide,
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Invalid ID")]
    InvalidVideoId(#[source] uuid::Error),
    #[error("Couldn't find JWT")]
    MissingCredentials,
    #[error("Couldn't validate JWT")]
    InvalidCredentials(#[source] AuthError),
    #[error("Video {0} not found")]
    VideoNotFound(Uuid),
    #[error("Not authorized to update this video")]
    NotOwner,
    #[error("File is too large. Maximum size is {limit} bytes.")]
    TooLarge { limit: u64 },
    #[error("Malformed multipart body: {0}")]
    Malformed(String),
    #[error("Missing `video` form field")]
    MissingFile,
    #[error("Invalid Content-Type")]
    InvalidContentType(#[source] mime::FromStrError),
    #[error("Unsupported media type `{0}`, expected video/mp4")]
    UnsupportedMediaType(String),
    #[error("Unable to stage upload")]
    Staging(#[source] io::Error),
    #[error("Could not determine video shape")]
    Classification(#[source] MediaError),
    #[error("Unable to process video for fast start")]
    Remux(#[source] MediaError),
    #[error("Failed to upload")]
    Upload(#[source] StorageError),
    #[error("Unable to get video")]
    RecordLookup(#[source] RepositoryError),
    #[error("Failed to update video")]
    RecordUpdate(#[source] RepositoryError),
}

impl IngestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IngestError::InvalidVideoId(_)
            | IngestError::VideoNotFound(_)
            | IngestError::TooLarge { .. }
            | IngestError::Malformed(_)
            | IngestError::MissingFile
            | IngestError::InvalidContentType(_)
            | IngestError::UnsupportedMediaType(_) => ErrorKind::ClientInput,
            IngestError::MissingCredentials
            | IngestError::InvalidCredentials(_)
            | IngestError::NotOwner => ErrorKind::Unauthorized,
            IngestError::Staging(_)
            | IngestError::Classification(_)
            | IngestError::Remux(_)
            | IngestError::Upload(_)
            | IngestError::RecordLookup(_)
            | IngestError::RecordUpdate(_) => ErrorKind::ServerSide,
        }
    }

    /// The full cause chain, for logging.
    pub fn detailed_message(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}
