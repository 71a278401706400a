//! certforge-cli library root.
//!
//! Re-exports the command and config layers so integration tests can
//! exercise them without spawning the binary.

pub mod commands;
pub mod config;
