//! CLI command implementations

pub mod advance;
pub mod config;
pub mod init;
pub mod path;
pub mod plan;
pub mod status;
pub mod sync;
