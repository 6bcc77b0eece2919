//! Process adapter for the ffmpeg toolchain.

mod command;
mod toolkit;

pub use command::{ToolCommand, ToolOutput};
pub use toolkit::{processed_path, FfmpegToolkit, PROCESSED_SUFFIX};
