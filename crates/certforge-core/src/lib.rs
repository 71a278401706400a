//! certforge-core
//!
//! Pure domain types for certificate generation: template and data file
//! classification, variable mappings, per-row render contexts and output
//! naming. No document or spreadsheet parsing lives here.

pub mod error;
pub mod models;
pub mod naming;
