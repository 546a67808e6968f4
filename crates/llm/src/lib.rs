//! Text-generation client abstraction for the Campus Guide engine.
//!
//! The RAG pipeline talks to an external text generator through the
//! [`TextGenerator`] trait; providers live in [`providers`] and are
//! constructed through [`create_generator`].

pub mod client;
pub mod factory;
pub mod providers;

pub use client::{GenerationRequest, GenerationResponse, TextGenerator, TokenUsage};
pub use factory::create_generator;
