//! certforge-batch
//!
//! Drives a certificate run: one render + PDF conversion per data row,
//! per-row failure isolation, and packaging of the results into a zip.

pub mod archive;
pub mod error;
pub mod generate;
pub mod workdir;

pub use generate::{GenerateOptions, Generator};
