//! Dataset ingestion - download, extract and upload pipeline for mirrored datasets

pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod types;
pub mod utils;
pub mod write;

pub use types::*;
