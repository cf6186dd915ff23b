//! Core types for the packing service.

mod chunk;
mod config;
mod source;

pub use chunk::ChunkRecord;
pub use config::{ChunkerConfig, PackingConfig, ServiceConfig};
pub use source::{
    document_name, DocumentReport, DocumentStatus, PackJobStatus, PackJobStatusResponse,
    StartPackJobRequest, StartPackJobResponse,
};
