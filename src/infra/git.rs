//! VCS service wrapper

use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::constants::CLONE_TIMEOUT_SECS;
use crate::error::DeployError;
use crate::infra::command::{stderr_text, CommandRunner};

/// Thin wrapper around the `git` binary.
#[derive(Clone, Debug, Default)]
pub struct GitClient;

impl GitClient {
    pub fn new() -> Self {
        Self
    }

    /// Shallow-clone `url` into `dest`.
    ///
    /// `dest` must not exist; git creates it. A non-zero exit surfaces as
    /// `Vcs` with the tool's diagnostic text.
    pub async fn shallow_clone(&self, url: &str, dest: &Path) -> Result<(), DeployError> {
        let dest_str = dest.to_string_lossy();
        info!(url = %url, dest = %dest_str, "Cloning repository");

        let output = CommandRunner::run(
            "git",
            &["clone", "--depth", "1", url, &dest_str],
            Duration::from_secs(CLONE_TIMEOUT_SECS),
        )
        .await
        .map_err(|e| DeployError::Tool {
            tool: "git",
            reason: e.to_string(),
        })?;

        if !output.status.success() {
            return Err(DeployError::Vcs {
                stderr: stderr_text(&output),
            });
        }

        Ok(())
    }
}
