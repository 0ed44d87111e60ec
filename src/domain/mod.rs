//! Domain models

pub mod deploy;
pub mod project;
