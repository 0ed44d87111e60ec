//! Container Runtime service wrapper
//!
//! The docker daemon owns all image and container lifecycle state; this
//! client holds only names and IDs and re-queries on demand.

use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::constants::{BUILD_TIMEOUT_SECS, DOCKER_CMD_TIMEOUT_SECS};
use crate::error::DeployError;
use crate::infra::command::{stderr_text, stdout_text, CommandRunner};

/// Thin wrapper around the `docker` binary.
#[derive(Clone, Debug, Default)]
pub struct DockerClient;

impl DockerClient {
    pub fn new() -> Self {
        Self
    }

    /// Build an image tagged `tag` from `context` as build context.
    pub async fn build(&self, context: &Path, tag: &str) -> Result<(), DeployError> {
        let context_str = context.to_string_lossy();
        info!(tag = %tag, context = %context_str, "Building image");

        let output = CommandRunner::run(
            "docker",
            &["build", "-t", tag, &context_str],
            Duration::from_secs(BUILD_TIMEOUT_SECS),
        )
        .await
        .map_err(|e| DeployError::Tool {
            tool: "docker",
            reason: e.to_string(),
        })?;

        if !output.status.success() {
            return Err(DeployError::Build {
                stderr: stderr_text(&output),
            });
        }

        Ok(())
    }

    /// Run a detached, auto-removing container from `image` with host `port`
    /// mapped to the same container port. When `mount` is set, bind it into
    /// the container's `/app` so on-disk edits are visible without a rebuild.
    ///
    /// Returns the container ID printed by the daemon.
    pub async fn run_detached(
        &self,
        image: &str,
        port: u16,
        mount: Option<&Path>,
    ) -> Result<String, DeployError> {
        let port_map = format!("{}:{}", port, port);
        let volume = mount.map(|workspace| format!("{}:/app", workspace.to_string_lossy()));

        let mut args = vec!["run", "--rm", "-d", "-p", port_map.as_str()];
        if let Some(volume) = volume.as_deref() {
            args.push("-v");
            args.push(volume);
        }
        args.push(image);

        let output = self.docker(&args).await?;
        if !output.status.success() {
            return Err(DeployError::Runtime {
                stderr: stderr_text(&output),
            });
        }

        Ok(stdout_text(&output))
    }

    /// IDs of containers currently publishing `port`.
    pub async fn containers_publishing(&self, port: u16) -> Result<Vec<String>, DeployError> {
        let filter = format!("publish={}", port);
        let output = self.docker(&["ps", "-q", "--filter", &filter]).await?;

        if !output.status.success() {
            return Err(DeployError::Runtime {
                stderr: stderr_text(&output),
            });
        }

        Ok(parse_container_ids(&stdout_text(&output)))
    }

    /// Stop a container, giving it `grace_secs` to exit before the kill.
    pub async fn stop(&self, container_id: &str, grace_secs: u32) -> Result<(), DeployError> {
        let grace = grace_secs.to_string();
        let output = self.docker(&["stop", "-t", &grace, container_id]).await?;

        if !output.status.success() {
            return Err(DeployError::Runtime {
                stderr: stderr_text(&output),
            });
        }

        Ok(())
    }

    /// Whether an image with this name exists locally.
    pub async fn image_exists(&self, image: &str) -> Result<bool, DeployError> {
        let output = self.docker(&["image", "inspect", image]).await?;
        if !output.status.success() {
            // docker prints the lookup failure on stderr; anything else there
            // is worth surfacing to the operator
            let stderr = stderr_text(&output);
            if !stderr.contains("No such image") {
                warn!(image = %image, stderr = %stderr, "docker image inspect failed");
            }
        }
        Ok(output.status.success())
    }

    async fn docker(&self, args: &[&str]) -> Result<std::process::Output, DeployError> {
        CommandRunner::run("docker", args, Duration::from_secs(DOCKER_CMD_TIMEOUT_SECS))
            .await
            .map_err(|e| DeployError::Tool {
                tool: "docker",
                reason: e.to_string(),
            })
    }
}

/// Container IDs from `docker ps -q` output, one per line.
///
/// An empty result means the target port is free and port release has
/// nothing to stop.
fn parse_container_ids(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_no_occupants() {
        // Nothing publishes the port; release is a no-op on this
        assert!(parse_container_ids("").is_empty());
        assert!(parse_container_ids("\n").is_empty());
    }

    #[test]
    fn test_parse_single_occupant() {
        assert_eq!(parse_container_ids("f3a9c1d2e4b5\n"), vec!["f3a9c1d2e4b5"]);
    }

    #[test]
    fn test_parse_multiple_occupants() {
        // docker ps can report several hits; each one must be stopped
        // individually, not passed to docker stop as a single blob
        let ids = parse_container_ids("f3a9c1d2e4b5\n0a1b2c3d4e5f\n");
        assert_eq!(ids, vec!["f3a9c1d2e4b5", "0a1b2c3d4e5f"]);
    }
}
