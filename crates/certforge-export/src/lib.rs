//! certforge-export
//!
//! Template handling for certificate generation: placeholder discovery,
//! per-row rendering of `.docx` and `.pptx` templates, and PDF conversion
//! through a headless office suite.

pub mod docx;
pub mod error;
pub mod package;
pub mod pdf;
pub mod placeholders;
pub mod pptx;
pub mod render;
mod xml;
