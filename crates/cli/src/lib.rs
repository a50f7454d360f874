//! Replicat CLI library
//!
//! Configuration, local-mirror collaborators and command implementations
//! behind the `replicat` binary.

pub mod cmd;
pub mod config;
pub mod mirror;
pub mod util;
