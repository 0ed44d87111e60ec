//! Service modules

pub mod deploy;
