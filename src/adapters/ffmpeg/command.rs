use crate::ports::MediaError;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::Command;

#[derive(Debug)]
pub struct ToolOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// One invocation of an external tool, with stdout and stderr captured.
///
/// The child is killed if the returned future is dropped or the timeout
/// expires.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<OsString>,
    timeout: Option<Duration>,
}

impl ToolCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    pub fn arg(&mut self, arg: impl Into<OsString>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn timeout(&mut self, timeout: Option<Duration>) -> &mut Self {
        self.timeout = timeout;
        self
    }

    fn tool_name(&self) -> String {
        self.program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    /// Run to completion. A non-zero exit is [`MediaError::Failed`] carrying
    /// the captured stderr.
    pub async fn execute(&self) -> Result<ToolOutput, MediaError> {
        let tool = self.tool_name();

        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| MediaError::Spawn {
                tool: tool.clone(),
                source,
            })?;

        let wait = child.wait_with_output();
        let output = match self.timeout {
            Some(after) => match tokio::time::timeout(after, wait).await {
                Ok(result) => result,
                Err(_) => return Err(MediaError::Timeout { tool, after }),
            },
            None => wait.await,
        }
        .map_err(|source| MediaError::Spawn {
            tool: tool.clone(),
            source,
        })?;

        let output = ToolOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !output.status.success() {
            tracing::warn!(tool = %tool, status = %output.status, "tool exited unsuccessfully");
            return Err(MediaError::Failed {
                tool,
                status: output.status,
                stderr: output.stderr.trim().to_string(),
            });
        }

        Ok(output)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_captures_stdout() {
        let output = ToolCommand::new("sh")
            .args(["-c", "printf hello"])
            .execute()
            .await
            .unwrap();
        assert!(output.status.success());
        assert_eq!(output.stdout, "hello");
    }

    #[tokio::test]
    async fn test_nonzero_exit_carries_stderr() {
        let err = ToolCommand::new("sh")
            .args(["-c", "echo 'moov atom not found' >&2; exit 1"])
            .execute()
            .await
            .unwrap_err();
        match err {
            MediaError::Failed { tool, stderr, .. } => {
                assert_eq!(tool, "sh");
                assert_eq!(stderr, "moov atom not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let err = ToolCommand::new("/nonexistent/ffprobe")
            .execute()
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::Spawn { ref tool, .. } if tool == "ffprobe"));
    }

    #[tokio::test]
    async fn test_timeout_fires() {
        let err = ToolCommand::new("sleep")
            .arg("10")
            .timeout(Some(Duration::from_millis(100)))
            .execute()
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::Timeout { .. }));
    }
}
