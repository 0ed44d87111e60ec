//! Project classification model

use serde::Serialize;

use crate::error::DeployError;

/// Marker file identifying a Python project
pub const PYTHON_MARKER: &str = "requirements.txt";

/// Marker file identifying a Node project
pub const NODE_MARKER: &str = "package.json";

/// Runtime category of a staged workspace.
///
/// Determined structurally from marker files, never declared by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    Python,
    Node,
    Unknown,
}

impl ProjectType {
    pub fn name(&self) -> &'static str {
        match self {
            ProjectType::Python => "python",
            ProjectType::Node => "node",
            ProjectType::Unknown => "unknown",
        }
    }

    /// Conventional host/container port for this runtime.
    ///
    /// `Unknown` has no port; every flow that reaches this point fails.
    pub fn port(&self) -> Result<u16, DeployError> {
        match self {
            ProjectType::Python => Ok(4567),
            ProjectType::Node => Ok(8000),
            ProjectType::Unknown => Err(DeployError::UnsupportedProject),
        }
    }
}

impl std::fmt::Display for ProjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_table() {
        assert_eq!(ProjectType::Python.port().unwrap(), 4567);
        assert_eq!(ProjectType::Node.port().unwrap(), 8000);
    }

    #[test]
    fn test_unknown_has_no_port() {
        assert!(matches!(
            ProjectType::Unknown.port(),
            Err(DeployError::UnsupportedProject)
        ));
    }
}
