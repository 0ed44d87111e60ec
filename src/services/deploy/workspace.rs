//! Workspace manager
//!
//! Owns the on-disk staging directory of every deployment: one directory per
//! deployment name under a shared root, holding the checked-out source tree
//! plus the synthesized Dockerfile.

use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::DeployError;
use crate::infra::GitClient;

/// Per-deployment staging directories under a shared root.
#[derive(Clone, Debug)]
pub struct WorkspaceManager {
    root: PathBuf,
    git: GitClient,
}

/// Whether `name` is safe to use as a workspace directory and image tag.
///
/// Names become path components and docker tags, so path separators and
/// parent references are rejected outright.
pub fn is_valid_repo_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

impl WorkspaceManager {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            git: GitClient::new(),
        }
    }

    /// Deterministic workspace path for a deployment name.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Whether a workspace for `name` has been staged.
    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_dir()
    }

    /// Destructively (re)stage a workspace: delete any previous content for
    /// this name, then shallow-clone `url` into a fresh directory.
    ///
    /// Callers needing an incremental update must use `place_file` plus the
    /// launcher's mount capability instead.
    pub async fn stage(&self, name: &str, url: &str) -> Result<PathBuf, DeployError> {
        let workspace = self.path_for(name);

        if workspace.exists() {
            info!(name = %name, "Removing previous workspace");
            tokio::fs::remove_dir_all(&workspace).await?;
        }

        self.git.shallow_clone(url, &workspace).await?;
        Ok(workspace)
    }

    /// Path of a previously staged workspace, or `NotFound`.
    pub fn ensure_exists(&self, name: &str) -> Result<PathBuf, DeployError> {
        let workspace = self.path_for(name);
        if workspace.is_dir() {
            Ok(workspace)
        } else {
            Err(DeployError::NotFound(format!("workspace '{}'", name)))
        }
    }

    /// Copy a single file into the workspace root, overwriting same-named
    /// content.
    pub async fn place_file(
        &self,
        workspace: &Path,
        src: &Path,
    ) -> Result<PathBuf, DeployError> {
        if !src.is_file() {
            return Err(DeployError::NotFound(format!(
                "file '{}'",
                src.display()
            )));
        }
        if !workspace.is_dir() {
            return Err(DeployError::NotFound(format!(
                "workspace '{}'",
                workspace.display()
            )));
        }

        let file_name = src
            .file_name()
            .ok_or_else(|| DeployError::NotFound(format!("file '{}'", src.display())))?;
        let dest = workspace.join(file_name);

        tokio::fs::copy(src, &dest).await?;
        info!(dest = %dest.display(), "Placed updated file into workspace");
        Ok(dest)
    }
}
