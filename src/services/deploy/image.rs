//! Image builder
//!
//! Writes the synthesized Dockerfile at the workspace root (idempotent
//! overwrite), then drives the container runtime to build the tagged image.
//! Skipped entirely on update flows: those reuse the image from the last
//! fresh build and get code freshness from the live mount instead.

use std::path::Path;
use tracing::info;

use crate::domain::project::ProjectType;
use crate::error::DeployError;
use crate::infra::DockerClient;
use crate::services::deploy::dockerfile;

/// Build `tag` from `workspace` for a classified project.
pub async fn build(
    docker: &DockerClient,
    workspace: &Path,
    kind: ProjectType,
    tag: &str,
) -> Result<(), DeployError> {
    let descriptor = dockerfile::synthesize(kind)?;
    tokio::fs::write(workspace.join("Dockerfile"), descriptor).await?;

    docker.build(workspace, tag).await?;
    info!(image = %tag, project_type = %kind, "Image built");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_unknown_project_fails_before_any_write() {
        let dir = TempDir::new().unwrap();
        let docker = DockerClient::new();

        let result = build(&docker, dir.path(), ProjectType::Unknown, "demo").await;
        assert!(matches!(result, Err(DeployError::UnsupportedProject)));
        assert!(!dir.path().join("Dockerfile").exists());
    }
}
