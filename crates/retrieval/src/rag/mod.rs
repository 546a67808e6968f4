//! RAG orchestration: the pipeline plus its response types.

pub mod pipeline;
pub mod types;

pub use pipeline::RagPipeline;
pub use types::{RagResponse, SourceRef};
