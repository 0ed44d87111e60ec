//! Project classifier
//!
//! Pure structural check over the workspace root. Must be re-run after every
//! workspace mutation and never cached: a single file drop can change the
//! project type.

use std::path::Path;

use crate::domain::project::{ProjectType, NODE_MARKER, PYTHON_MARKER};
use crate::error::DeployError;

/// Classify a workspace by its marker files.
///
/// Exactly one marker must be present for the workspace to be valid. Both
/// markers at once is reported explicitly rather than letting check order
/// silently pick a winner.
pub fn classify(workspace: &Path) -> Result<ProjectType, DeployError> {
    let is_python = workspace.join(PYTHON_MARKER).is_file();
    let is_node = workspace.join(NODE_MARKER).is_file();

    match (is_python, is_node) {
        (true, true) => Err(DeployError::MultipleProjectMarkers),
        (true, false) => Ok(ProjectType::Python),
        (false, true) => Ok(ProjectType::Node),
        (false, false) => Ok(ProjectType::Unknown),
    }
}
