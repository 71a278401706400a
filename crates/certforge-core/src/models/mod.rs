pub mod certificate;
pub mod context;
pub mod dataset;
pub mod format;
pub mod mapping;
