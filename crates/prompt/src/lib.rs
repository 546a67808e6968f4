//! Prompt templates for the Campus Guide assistant.
//!
//! Holds the system prompt, the RAG answer template, and the context
//! formatter that turns retrieved documents into numbered `[문서 N]` blocks.

pub mod builder;
pub mod templates;

pub use builder::{build_rag_prompt, format_context, ContextItem, ContextKind};
pub use templates::{RAG_PROMPT_TEMPLATE, SYSTEM_PROMPT};
