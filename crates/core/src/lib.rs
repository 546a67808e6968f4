//! Campus Guide Core Library
//!
//! This crate provides the foundational utilities for the Campus Guide engine:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management
//! - Namespaced TTL cache with silent degradation

pub mod cache;
pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use cache::MemoryCache;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
