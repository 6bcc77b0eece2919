//! Local files owned by one ingest run, and the key of the object they become.
//!
//! Both local file types delete themselves on drop, so a request that errors,
//! panics or is cancelled never leaves them behind.

use std::fmt;
use std::io;
use std::path::Path;

use tempfile::{NamedTempFile, TempPath};
use thiserror::Error;
use uuid::Uuid;

use super::shape::ShapeCategory;

/// Raw upload copied to local disk, read position rewound to the start.
#[derive(Debug)]
pub struct StagedUpload {
    file: NamedTempFile,
    len: u64,
    media_type: String,
}

impl StagedUpload {
    pub fn new(file: NamedTempFile, len: u64, media_type: String) -> Self {
        Self {
            file,
            len,
            media_type,
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("could not stat processed file")]
    Stat(#[source] io::Error),
    #[error("processed file is empty")]
    Empty,
}

/// Remuxed output file. Only obtainable through [`RemuxedAsset::seal`], which
/// rejects missing and zero-length files.
#[derive(Debug)]
pub struct RemuxedAsset {
    path: TempPath,
    len: u64,
}

impl RemuxedAsset {
    /// Take ownership of a tool's output file after checking it is non-empty.
    ///
    /// On error the file (if any) is removed when `path` drops.
    pub async fn seal(path: TempPath) -> Result<Self, AssetError> {
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(AssetError::Stat)?;
        if metadata.len() == 0 {
            return Err(AssetError::Empty);
        }
        Ok(Self {
            len: metadata.len(),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Object key: `{folder}/{random id}.{extension}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn generate(shape: ShapeCategory, media_type: &str) -> Self {
        Self(format!(
            "{}/{}.{}",
            shape.folder(),
            Uuid::new_v4().simple(),
            extension_for(media_type)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// File extension for a media type: its subtype, or `bin` if unparsable.
pub fn extension_for(media_type: &str) -> String {
    media_type
        .parse::<mime::Mime>()
        .ok()
        .map(|mime| mime.subtype().as_str().to_ascii_lowercase())
        .filter(|subtype| !subtype.is_empty() && subtype.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| String::from("bin"))
}
