//! Text-generator factory.
//!
//! Resolves a provider name from configuration into a concrete client.

use crate::client::TextGenerator;
use crate::providers::OllamaGenerator;
use campus_core::{AppError, AppResult};
use std::sync::Arc;

/// Create a text generator based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier (currently "ollama")
/// * `endpoint` - Optional custom endpoint URL
///
/// # Errors
/// Returns `AppError::Llm` for unknown providers.
pub fn create_generator(
    provider: &str,
    endpoint: Option<&str>,
) -> AppResult<Arc<dyn TextGenerator>> {
    match provider.to_lowercase().as_str() {
        "ollama" => {
            let base_url = endpoint.unwrap_or("http://localhost:11434");
            Ok(Arc::new(OllamaGenerator::with_base_url(base_url)))
        }
        _ => Err(AppError::Llm(format!("Unknown provider: {}", provider))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_ollama_generator() {
        let generator = create_generator("ollama", None);
        assert!(generator.is_ok());
        assert_eq!(generator.unwrap().provider_name(), "ollama");
    }

    #[test]
    fn test_create_with_custom_endpoint() {
        let generator = create_generator("ollama", Some("http://localhost:8080"));
        assert!(generator.is_ok());
    }

    #[test]
    fn test_unknown_provider() {
        match create_generator("unknown", None) {
            Err(e) => assert!(e.to_string().contains("Unknown provider")),
            Ok(_) => panic!("Expected error for unknown provider"),
        }
    }
}
