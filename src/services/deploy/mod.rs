//! Deployment orchestration
//!
//! `Deployer` composes the workspace manager, classifier, image builder,
//! port reconciler and launcher into the three supported flows:
//!
//! - fresh run: stage, classify, build, free the port, launch
//! - update-and-run: place file, re-classify, free the port, relaunch the
//!   existing image with the workspace mounted
//! - clone-update-and-run: fresh run first if the workspace is absent, then
//!   always update on top
//!
//! Flows hold a per-name lock for their whole duration and a per-port lock
//! across release-port + launch. No step is retried and nothing is rolled
//! back: a later failure leaves earlier artifacts (workspace, image) in
//! place for the next attempt.

pub mod classify;
pub mod dockerfile;
pub mod image;
pub mod launcher;
pub mod ports;
pub mod workspace;

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::domain::deploy::DeployOutcome;
use crate::error::DeployError;
use crate::infra::DockerClient;
use crate::state::KeyedLocks;

pub use workspace::{is_valid_repo_name, WorkspaceManager};

/// Deployment orchestrator
pub struct Deployer {
    workspace: WorkspaceManager,
    docker: DockerClient,
    name_locks: KeyedLocks<String>,
    port_locks: KeyedLocks<u16>,
}

impl Deployer {
    pub fn new(workspace_root: PathBuf) -> Self {
        Self {
            workspace: WorkspaceManager::new(workspace_root),
            docker: DockerClient::new(),
            name_locks: KeyedLocks::new(),
            port_locks: KeyedLocks::new(),
        }
    }

    /// Fresh run: always re-stages and rebuilds, even when a workspace and
    /// image for `name` already exist.
    pub async fn run(&self, repo_url: &str, name: &str) -> Result<DeployOutcome, DeployError> {
        let _flow = self.name_locks.acquire(name.to_string()).await;
        self.run_locked(repo_url, name).await
    }

    /// Update-and-run: requires a previously staged workspace; reuses the
    /// image from the last fresh build and mounts the updated tree instead
    /// of rebuilding.
    pub async fn update(&self, file: &Path, name: &str) -> Result<DeployOutcome, DeployError> {
        let _flow = self.name_locks.acquire(name.to_string()).await;
        self.update_locked(file, name).await
    }

    /// Clone-update-and-run: guarantees a workspace and image exist (full
    /// fresh run when the workspace is absent), then applies the file update
    /// and relaunches with the mount.
    pub async fn clone_update(
        &self,
        repo_url: &str,
        file: &Path,
        name: &str,
    ) -> Result<DeployOutcome, DeployError> {
        let _flow = self.name_locks.acquire(name.to_string()).await;

        if !self.workspace.exists(name) {
            self.run_locked(repo_url, name).await?;
        }

        if !file.is_file() {
            return Err(DeployError::NotFound(format!(
                "file '{}' after cloning",
                file.display()
            )));
        }

        self.update_locked(file, name).await
    }

    async fn run_locked(&self, repo_url: &str, name: &str) -> Result<DeployOutcome, DeployError> {
        info!(name = %name, repo_url = %repo_url, "Starting fresh deployment");

        let workspace = self.workspace.stage(name, repo_url).await?;
        let kind = classify::classify(&workspace)?;
        let port = kind.port()?;
        info!(name = %name, project_type = %kind, port = port, "Workspace classified");

        image::build(&self.docker, &workspace, kind, name).await?;

        let _port_guard = self.port_locks.acquire(port).await;
        ports::release_port(&self.docker, port).await?;
        let container_id = launcher::launch_fresh(&self.docker, name, port).await?;
        launcher::wait_until_ready(port).await?;

        info!(name = %name, container_id = %container_id, "Fresh deployment complete");
        Ok(DeployOutcome::new(container_id, kind, port))
    }

    async fn update_locked(&self, file: &Path, name: &str) -> Result<DeployOutcome, DeployError> {
        info!(name = %name, file = %file.display(), "Starting update deployment");

        let workspace = self.workspace.ensure_exists(name)?;
        self.workspace.place_file(&workspace, file).await?;

        // Re-derive the port from current contents; the dropped file may
        // have changed the project type.
        let kind = classify::classify(&workspace)?;
        let port = kind.port()?;

        if !self.docker.image_exists(name).await? {
            warn!(name = %name, "Workspace exists but image does not; a fresh run is required");
            return Err(DeployError::NotFound(format!("image '{}'", name)));
        }

        let _port_guard = self.port_locks.acquire(port).await;
        ports::release_port(&self.docker, port).await?;
        let container_id =
            launcher::launch_with_mount(&self.docker, name, port, &workspace).await?;
        launcher::wait_until_ready(port).await?;

        info!(name = %name, container_id = %container_id, "Update deployment complete");
        Ok(DeployOutcome::new(container_id, kind, port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_update_without_prior_stage_is_not_found() {
        let root = TempDir::new().unwrap();
        let deployer = Deployer::new(root.path().to_path_buf());

        let src = root.path().join("app.py");
        std::fs::write(&src, "print('hi')").unwrap();

        // Fails on the workspace check, before any file placement or
        // container operation.
        let result = deployer.update(&src, "never-staged").await;
        assert!(matches!(result, Err(DeployError::NotFound(_))));
        assert!(!root.path().join("never-staged").exists());
    }

    #[tokio::test]
    async fn test_update_with_unknown_contents_is_unsupported() {
        let root = TempDir::new().unwrap();
        let deployer = Deployer::new(root.path().to_path_buf());

        let workspace = root.path().join("demo");
        std::fs::create_dir(&workspace).unwrap();
        let src = root.path().join("notes.md");
        std::fs::write(&src, "# notes").unwrap();

        let result = deployer.update(&src, "demo").await;
        assert!(matches!(result, Err(DeployError::UnsupportedProject)));
        // The file placement itself still happened; classification runs on
        // the mutated workspace.
        assert!(workspace.join("notes.md").is_file());
    }

    #[tokio::test]
    async fn test_update_with_both_markers_is_ambiguous() {
        let root = TempDir::new().unwrap();
        let deployer = Deployer::new(root.path().to_path_buf());

        let workspace = root.path().join("demo");
        std::fs::create_dir(&workspace).unwrap();
        std::fs::write(workspace.join("package.json"), "{}").unwrap();
        let src = root.path().join("requirements.txt");
        std::fs::write(&src, "flask\n").unwrap();

        let result = deployer.update(&src, "demo").await;
        assert!(matches!(
            result,
            Err(DeployError::MultipleProjectMarkers)
        ));
    }
}
