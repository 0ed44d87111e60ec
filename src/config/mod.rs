//! Environment configuration

use std::env;
use std::path::PathBuf;

/// Environment configuration
#[derive(Clone, Debug)]
pub struct EnvConfig {
    /// HTTP listening port
    pub port: u16,
    /// Root directory for per-deployment workspaces
    pub workspace_root: PathBuf,
    /// Directory where uploaded files are staged before placement
    pub upload_dir: PathBuf,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(7654);

        let workspace_root = env::var("DEPLOY_WORKSPACE_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"));

        let upload_dir = env::var("DEPLOY_UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| workspace_root.clone());

        Self {
            port,
            workspace_root,
            upload_dir,
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Constants
pub mod constants {
    /// Timeout for `git clone` (seconds)
    pub const CLONE_TIMEOUT_SECS: u64 = 300;

    /// Timeout for `docker build` (seconds)
    pub const BUILD_TIMEOUT_SECS: u64 = 1800; // 30 minutes

    /// Timeout for short docker commands: run, ps, stop, inspect (seconds)
    pub const DOCKER_CMD_TIMEOUT_SECS: u64 = 60;

    /// How long to wait for a launched container to start listening (seconds)
    pub const READY_TIMEOUT_SECS: u64 = 30;

    /// Initial readiness probe interval (milliseconds); doubles up to 2s
    pub const READY_POLL_START_MS: u64 = 100;

    /// Version
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_env() {
        env::remove_var("PORT");
        env::remove_var("DEPLOY_WORKSPACE_ROOT");
        env::remove_var("DEPLOY_UPLOAD_DIR");

        let config = EnvConfig::from_env();
        assert_eq!(config.port, 7654);
        assert_eq!(config.workspace_root, PathBuf::from("/tmp"));
        assert_eq!(config.upload_dir, config.workspace_root);
    }
}
