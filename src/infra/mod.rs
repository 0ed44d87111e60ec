//! Infrastructure: wrappers around external binaries

pub mod command;
pub mod docker;
pub mod git;

pub use docker::DockerClient;
pub use git::GitClient;
