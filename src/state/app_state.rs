//! Application state

use chrono::{DateTime, Utc};

use crate::config::EnvConfig;
use crate::services::deploy::Deployer;

/// Application state
pub struct AppState {
    /// Environment configuration
    pub config: EnvConfig,
    /// Deployment orchestrator
    pub deployer: Deployer,
    /// Service start time
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Create new application state from the environment
    pub fn new() -> Self {
        Self::with_config(EnvConfig::from_env())
    }

    /// Create application state from an explicit configuration
    pub fn with_config(config: EnvConfig) -> Self {
        tracing::info!(
            port = config.port,
            workspace_root = %config.workspace_root.display(),
            upload_dir = %config.upload_dir.display(),
            "Loaded configuration"
        );

        // Uploads and staging fail with opaque 500s if these are missing
        for dir in [&config.workspace_root, &config.upload_dir] {
            if let Err(e) = std::fs::create_dir_all(dir) {
                tracing::error!(
                    dir = %dir.display(),
                    error = %e,
                    "Failed to create staging directory"
                );
            }
        }

        let deployer = Deployer::new(config.workspace_root.clone());

        Self {
            config,
            deployer,
            started_at: Utc::now(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_with_config_creates_staging_directories() {
        let root = TempDir::new().unwrap();
        let config = EnvConfig {
            port: 7654,
            workspace_root: root.path().join("workspaces"),
            upload_dir: root.path().join("uploads"),
        };

        let state = AppState::with_config(config);
        assert!(state.config.workspace_root.is_dir());
        assert!(state.config.upload_dir.is_dir());
    }
}
