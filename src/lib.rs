//! Repo Deploy Agent
//!
//! Clones a source repository, figures out what kind of project it is,
//! builds a Docker image for it and runs it behind a fixed host port.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod server;
pub mod services;
pub mod state;

pub use server::{serve, RuntimeConfig};
