//! Retrieval and answer composition for the campus assistant.
//!
//! This crate holds the question classifier, the document stores, the
//! embedding service, the hybrid search engine, and the RAG pipeline that
//! ties them together with the LLM layer.

pub mod classifier;
pub mod embeddings;
pub mod fallback;
pub mod rag;
pub mod search;
pub mod store;
pub mod types;
pub mod validator;

pub use classifier::QuestionClassifier;
pub use embeddings::{EmbeddingService, similarity};
pub use fallback::FallbackHandler;
pub use rag::{RagPipeline, RagResponse, SourceRef};
pub use search::SearchEngine;
pub use store::{load_corpus, stores_from_documents, DocumentStore, MemoryStore};
pub use types::{Category, Document, SearchResult};
pub use validator::{AnswerValidator, ValidationReport};

#[cfg(test)]
mod tests;
