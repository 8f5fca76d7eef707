//! Shell executor - runs a task description as an OS shell command
//!
//! Features:
//! - `sh -c` / `cmd /C`, or a configured shell
//! - stdout/stderr capture and exit code tracking
//! - Optional hard timeout (the process is killed on expiry)

use crate::executor::CapabilityExecutor;
use async_trait::async_trait;
use blnt_foundation::{DesktopConfig, Error, Result};
use serde_json::{json, Value};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Shell executor configuration
#[derive(Debug, Clone, Default)]
pub struct ShellExecutorConfig {
    /// Shell program; `None` picks the platform default
    pub shell: Option<String>,

    /// Kill the command after this long
    pub timeout: Option<Duration>,

    /// Log stderr of successful commands
    pub verbose: bool,
}

impl ShellExecutorConfig {
    pub fn from_desktop(desktop: &DesktopConfig) -> Self {
        Self {
            shell: desktop.shell.clone(),
            timeout: None,
            verbose: desktop.verbose,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Runs commands on the host
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor {
    config: ShellExecutorConfig,
}

impl ShellExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ShellExecutorConfig) -> Self {
        Self { config }
    }

    fn command(&self, line: &str) -> Command {
        let (shell, shell_arg) = match &self.config.shell {
            Some(shell) if shell.ends_with("cmd") || shell.ends_with("cmd.exe") => {
                (shell.as_str(), "/C")
            }
            Some(shell) => (shell.as_str(), "-c"),
            None if cfg!(windows) => ("cmd", "/C"),
            None => ("sh", "-c"),
        };

        let mut cmd = Command::new(shell);
        cmd.arg(shell_arg)
            .arg(line)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl CapabilityExecutor for ShellExecutor {
    async fn execute(&self, description: &str) -> Result<Value> {
        let line = description.trim();
        if line.is_empty() {
            return Err(Error::InvalidInput("Empty command".to_string()));
        }

        debug!("Executing command: {}", line);

        let child = self
            .command(line)
            .spawn()
            .map_err(|e| Error::executor(format!("Failed to spawn process: {}", e)))?;

        // Dropping the wait future on timeout drops the child, which kills it
        let output = match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| {
                    Error::Timeout(format!(
                        "Command exceeded {:.1}s: {}",
                        limit.as_secs_f64(),
                        line
                    ))
                })?,
            None => child.wait_with_output().await,
        }
        .map_err(|e| Error::executor(format!("Failed to wait for process: {}", e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let exit_code = output.status.code();

        if !output.status.success() {
            let code = exit_code.map_or_else(|| "signal".to_string(), |c| c.to_string());
            let detail = stderr.trim();
            return Err(Error::executor(if detail.is_empty() {
                format!("Command exited with {}", code)
            } else {
                format!("Command exited with {}: {}", code, detail)
            }));
        }

        if self.config.verbose && !stderr.is_empty() {
            warn!("STDERR: {}", stderr.trim_end());
        }

        Ok(json!({
            "stdout": stdout,
            "stderr": stderr,
            "exitCode": exit_code,
        }))
    }

    fn name(&self) -> &'static str {
        "shell"
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo() {
        let executor = ShellExecutor::new();
        let result = executor.execute("echo hi").await.unwrap();
        assert_eq!(result["stdout"], "hi\n");
        assert_eq!(result["exitCode"], 0);
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_error() {
        let executor = ShellExecutor::new();
        let err = executor.execute("echo nope >&2; exit 3").await.unwrap_err();
        assert_eq!(err.to_string(), "Command exited with 3: nope");
    }

    #[tokio::test]
    async fn test_timeout() {
        let executor = ShellExecutor::with_config(
            ShellExecutorConfig::default().with_timeout(Duration::from_millis(100)),
        );
        let err = executor.execute("sleep 5").await.unwrap_err();
        assert!(matches!(err, Error::Timeout(_)));
    }

    #[tokio::test]
    async fn test_empty_command() {
        let executor = ShellExecutor::new();
        assert!(matches!(
            executor.execute("   ").await,
            Err(Error::InvalidInput(_))
        ));
    }
}
