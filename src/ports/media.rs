use crate::domain::{AssetError, ProbeResult, RemuxedAsset};
use async_trait::async_trait;
use std::io;
use std::path::Path;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("failed to spawn {tool}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },
    #[error("{tool} timed out after {after:?}")]
    Timeout { tool: String, after: Duration },
    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        tool: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("could not parse probe output")]
    Parse(#[from] serde_json::Error),
    #[error("no video streams found")]
    NoStreams,
    #[error(transparent)]
    Output(#[from] AssetError),
}

/// External media tooling: inspection and faststart remuxing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaToolkit: Send + Sync {
    /// Inspect a local video and return its stream metadata.
    ///
    /// An empty stream list is reported as [`MediaError::NoStreams`].
    async fn probe(&self, path: &Path) -> Result<ProbeResult, MediaError>;

    /// Copy all streams into a new MP4 with the index moved to the front.
    ///
    /// The output is a sibling of `path` and is deleted when the returned
    /// asset drops.
    async fn remux(&self, path: &Path) -> Result<RemuxedAsset, MediaError>;
}
