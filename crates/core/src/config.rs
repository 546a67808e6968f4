//! Configuration management for the Campus Guide engine.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Environment variables
//! - Command-line flags
//! - A YAML config file (campus.yaml)
//!
//! Environment variables override file values; CLI flags override everything.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Main application configuration.
///
/// This struct holds all global options that affect engine behavior:
/// the generation provider, the embedding model, cache policy, and the
/// contact channel surfaced in fallback answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Text-generation provider (e.g., "ollama")
    pub provider: String,

    /// Generation model identifier
    pub model: String,

    /// Provider endpoint override
    pub endpoint: Option<String>,

    /// Embedding provider ("ollama" or "trigram")
    pub embedding_provider: String,

    /// Embedding model identifier
    pub embedding_model: String,

    /// Embedding vector dimensions
    pub embedding_dimensions: usize,

    /// Whether caching is enabled at all
    pub cache_enabled: bool,

    /// TTL for cached embeddings, in seconds
    pub cache_ttl_embedding: u64,

    /// TTL for cached search results, in seconds
    pub cache_ttl_search: u64,

    /// Deadline for a single generation call, in seconds
    pub generation_timeout_secs: u64,

    /// Contact channel shown in fallback answers (e.g., an office phone number)
    pub contact_channel: String,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// YAML config file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmSection>,
    embedding: Option<EmbeddingSection>,
    cache: Option<CacheSection>,
    logging: Option<LoggingSection>,
    contact_channel: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LlmSection {
    provider: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EmbeddingSection {
    provider: Option<String>,
    model: Option<String>,
    dimensions: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheSection {
    enabled: Option<bool>,
    ttl_embedding_secs: Option<u64>,
    ttl_search_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            provider: "ollama".to_string(), // Local-first default
            model: "llama3.2".to_string(),
            endpoint: None,
            embedding_provider: "trigram".to_string(),
            embedding_model: "trigram-v1".to_string(),
            embedding_dimensions: 384,
            cache_enabled: true,
            cache_ttl_embedding: 86_400, // embeddings are stable for a text+model
            cache_ttl_search: 3_600,
            generation_timeout_secs: 30,
            contact_channel: "02-970-XXXX".to_string(),
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `CAMPUS_CONFIG`: Path to config file
    /// - `CAMPUS_PROVIDER`: Generation provider
    /// - `CAMPUS_MODEL`: Generation model identifier
    /// - `CAMPUS_EMBEDDING_PROVIDER`: Embedding provider
    /// - `CAMPUS_CACHE_ENABLED`: "0"/"false" disables caching
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(config_file) = std::env::var("CAMPUS_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        // Merge YAML config file if present
        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("campus.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("CAMPUS_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("CAMPUS_MODEL") {
            config.model = model;
        }

        if let Ok(provider) = std::env::var("CAMPUS_EMBEDDING_PROVIDER") {
            config.embedding_provider = provider;
        }

        if let Ok(flag) = std::env::var("CAMPUS_CACHE_ENABLED") {
            config.cache_enabled = !matches!(flag.as_str(), "0" | "false" | "no");
        }

        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(llm) = config_file.llm {
            if let Some(provider) = llm.provider {
                result.provider = provider;
            }
            if let Some(model) = llm.model {
                result.model = model;
            }
            if llm.endpoint.is_some() {
                result.endpoint = llm.endpoint;
            }
            if let Some(timeout) = llm.timeout_secs {
                result.generation_timeout_secs = timeout;
            }
        }

        if let Some(embedding) = config_file.embedding {
            if let Some(provider) = embedding.provider {
                result.embedding_provider = provider;
            }
            if let Some(model) = embedding.model {
                result.embedding_model = model;
            }
            if let Some(dimensions) = embedding.dimensions {
                result.embedding_dimensions = dimensions;
            }
        }

        if let Some(cache) = config_file.cache {
            if let Some(enabled) = cache.enabled {
                result.cache_enabled = enabled;
            }
            if let Some(ttl) = cache.ttl_embedding_secs {
                result.cache_ttl_embedding = ttl;
            }
            if let Some(ttl) = cache.ttl_search_secs {
                result.cache_ttl_search = ttl;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(channel) = config_file.contact_channel {
            result.contact_channel = channel;
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// This method merges command-line flags with the loaded configuration,
    /// giving precedence to CLI flags over environment variables.
    pub fn with_overrides(
        mut self,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate configuration for the active providers.
    pub fn validate(&self) -> AppResult<()> {
        let known_providers = ["ollama"];
        if !known_providers.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                known_providers.join(", ")
            )));
        }

        let known_embedding = ["ollama", "trigram"];
        if !known_embedding.contains(&self.embedding_provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding_provider,
                known_embedding.join(", ")
            )));
        }

        if self.embedding_dimensions == 0 {
            return Err(AppError::Config(
                "Embedding dimensions must be non-zero".to_string(),
            ));
        }

        Ok(())
    }
}
