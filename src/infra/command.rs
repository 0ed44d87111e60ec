//! Command executor
//!
//! Single place where external processes are spawned. Every call blocks until
//! the process exits or the timeout fires; there is no cancellation path.

use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

/// Command executor
pub struct CommandRunner;

/// Command execution error
#[derive(Debug)]
pub enum CommandError {
    /// The binary could not be started
    SpawnFailed(std::io::Error),
    /// The command did not exit within the timeout
    Timeout,
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::SpawnFailed(e) => write!(f, "Failed to spawn command: {}", e),
            CommandError::Timeout => write!(f, "Command timed out"),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::SpawnFailed(e) => Some(e),
            CommandError::Timeout => None,
        }
    }
}

impl CommandRunner {
    /// Run a command to completion, capturing stdout and stderr.
    ///
    /// `kill_on_drop` ensures the child does not outlive a timeout: when the
    /// output future is dropped by the timeout branch, the process is killed
    /// and reaped instead of running on orphaned.
    pub async fn run(
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output, CommandError> {
        let child = Command::new(program).args(args).kill_on_drop(true).output();

        tokio::select! {
            result = child => {
                result.map_err(CommandError::SpawnFailed)
            }
            _ = tokio::time::sleep(timeout) => {
                Err(CommandError::Timeout)
            }
        }
    }
}

/// Decode captured stderr for error reporting.
pub fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

/// Decode captured stdout.
pub fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_success() {
        let result = CommandRunner::run("echo", &["hello"], Duration::from_secs(5)).await;

        assert!(result.is_ok());
        let output = result.unwrap();
        assert!(output.status.success());
        assert_eq!(stdout_text(&output), "hello");
    }

    #[tokio::test]
    async fn test_run_not_found() {
        let result =
            CommandRunner::run("nonexistent_command_12345", &[], Duration::from_secs(5)).await;

        assert!(matches!(result, Err(CommandError::SpawnFailed(_))));
    }

    #[tokio::test]
    async fn test_run_timeout() {
        let result = CommandRunner::run("sleep", &["5"], Duration::from_millis(50)).await;

        assert!(matches!(result, Err(CommandError::Timeout)));
    }

    #[tokio::test]
    async fn test_run_timeout_kills_child() {
        // Distinctive argument so pgrep finds only our child
        let result =
            CommandRunner::run("sleep", &["7654.25"], Duration::from_millis(100)).await;
        assert!(matches!(result, Err(CommandError::Timeout)));

        // Give the runtime a moment to deliver the kill and reap
        tokio::time::sleep(Duration::from_millis(300)).await;

        let survivors = std::process::Command::new("pgrep")
            .args(["-f", "sleep 7654.25"])
            .output()
            .unwrap();
        assert!(
            !survivors.status.success(),
            "child outlived the timeout: pid(s) {}",
            String::from_utf8_lossy(&survivors.stdout).trim()
        );
    }
}
