use super::command::ToolCommand;
use crate::config::ToolConfig;
use crate::domain::{AssetError, ProbeResult, RemuxedAsset};
use crate::ports::{MediaError, MediaToolkit};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tempfile::TempPath;

/// Suffix appended to the input path to name the remuxed output.
pub const PROCESSED_SUFFIX: &str = ".processing";

/// [`MediaToolkit`] backed by the `ffprobe` and `ffmpeg` binaries.
#[derive(Debug, Clone)]
pub struct FfmpegToolkit {
    tools: ToolConfig,
}

impl FfmpegToolkit {
    pub fn new(tools: ToolConfig) -> Self {
        Self { tools }
    }
}

pub fn processed_path(input: &Path) -> PathBuf {
    let mut output: OsString = input.as_os_str().to_owned();
    output.push(PROCESSED_SUFFIX);
    PathBuf::from(output)
}

#[async_trait]
impl MediaToolkit for FfmpegToolkit {
    async fn probe(&self, path: &Path) -> Result<ProbeResult, MediaError> {
        let output = ToolCommand::new(&self.tools.ffprobe_path)
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(path)
            .timeout(self.tools.timeout)
            .execute()
            .await?;

        let probe = ProbeResult::from_json(&output.stdout)?;
        if probe.streams.is_empty() {
            return Err(MediaError::NoStreams);
        }
        Ok(probe)
    }

    async fn remux(&self, path: &Path) -> Result<RemuxedAsset, MediaError> {
        // Guard first so partial output is removed on every failure path.
        let output = TempPath::try_from_path(processed_path(path))
            .map_err(|e| MediaError::Output(AssetError::Stat(e)))?;

        ToolCommand::new(&self.tools.ffmpeg_path)
            .arg("-y")
            .arg("-i")
            .arg(path)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4"])
            .arg(output.to_path_buf())
            .timeout(self.tools.timeout)
            .execute()
            .await?;

        Ok(RemuxedAsset::seal(output).await?)
    }
}
