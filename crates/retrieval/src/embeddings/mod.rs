//! Embedding generation with caching.
//!
//! `EmbeddingService` wraps an [`EmbeddingProvider`] with the shared cache
//! and lazy provider construction. The provider is only built on first use,
//! so constructing the service never touches the network.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};

use campus_core::{AppConfig, AppResult, MemoryCache};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::debug;

const CACHE_NAMESPACE: &str = "embedding";

/// Rescaled cosine similarity in `[0, 1]`.
///
/// Raw cosine lands in `[-1, 1]`; rescaling keeps downstream score fusion
/// on one footing with keyword relevance. Either vector having zero norm
/// (e.g. the blank-text embedding) scores 0.0.
pub fn similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let cosine = dot / (norm_a * norm_b);
    (cosine + 1.0) / 2.0
}

/// Cache key input: the same text embedded by a different model must not
/// collide.
#[derive(Serialize)]
struct EmbeddingKey<'a> {
    provider: &'a str,
    model: &'a str,
    text: &'a str,
}

pub struct EmbeddingService {
    config: AppConfig,
    cache: Arc<MemoryCache>,
    ttl: Duration,
    provider: OnceCell<Arc<dyn EmbeddingProvider>>,
}

impl EmbeddingService {
    pub fn new(config: AppConfig, cache: Arc<MemoryCache>) -> Self {
        let ttl = Duration::from_secs(config.cache_ttl_embedding);
        Self {
            config,
            cache,
            ttl,
            provider: OnceCell::new(),
        }
    }

    /// Build a service around an already-constructed provider.
    /// Used by tests and by callers that manage provider lifetime themselves.
    pub fn with_provider(
        provider: Arc<dyn EmbeddingProvider>,
        config: AppConfig,
        cache: Arc<MemoryCache>,
    ) -> Self {
        let ttl = Duration::from_secs(config.cache_ttl_embedding);
        Self {
            config,
            cache,
            ttl,
            provider: OnceCell::new_with(Some(provider)),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.config.embedding_dimensions
    }

    async fn provider(&self) -> AppResult<&Arc<dyn EmbeddingProvider>> {
        self.provider
            .get_or_try_init(|| async { provider::create_provider(&self.config) })
            .await
    }

    fn cache_key(&self, text: &str) -> String {
        MemoryCache::hash_key(&EmbeddingKey {
            provider: &self.config.embedding_provider,
            model: &self.config.embedding_model,
            text,
        })
    }

    /// Embed one text. Blank text short-circuits to the zero vector
    /// without touching the provider or the cache.
    pub async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        if text.trim().is_empty() {
            return Ok(vec![0.0; self.dimensions()]);
        }

        let key = self.cache_key(text);
        if let Some(cached) = self.cache.get::<Vec<f32>>(CACHE_NAMESPACE, &key) {
            return Ok(cached);
        }

        let provider = self.provider().await?;
        let embedding = provider.embed(text).await?;
        self.cache
            .set(CACHE_NAMESPACE, &key, &embedding, Some(self.ttl));
        Ok(embedding)
    }

    /// Embed many texts, preserving input order. Cached texts are served
    /// from the cache; only the misses go to the provider, in one batch.
    pub async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        let mut results: Vec<Option<Vec<f32>>> = vec![None; texts.len()];
        let mut missing: Vec<(usize, String)> = Vec::new();

        for (i, text) in texts.iter().enumerate() {
            if text.trim().is_empty() {
                results[i] = Some(vec![0.0; self.dimensions()]);
                continue;
            }
            let key = self.cache_key(text);
            match self.cache.get::<Vec<f32>>(CACHE_NAMESPACE, &key) {
                Some(cached) => results[i] = Some(cached),
                None => missing.push((i, text.clone())),
            }
        }

        if !missing.is_empty() {
            debug!(
                total = texts.len(),
                misses = missing.len(),
                "Embedding batch"
            );
            let provider = self.provider().await?;
            let batch: Vec<String> = missing.iter().map(|(_, t)| t.clone()).collect();
            let embeddings = provider.embed_batch(&batch).await?;

            for ((i, text), embedding) in missing.into_iter().zip(embeddings) {
                let key = self.cache_key(&text);
                self.cache
                    .set(CACHE_NAMESPACE, &key, &embedding, Some(self.ttl));
                results[i] = Some(embedding);
            }
        }

        // Every slot is filled: blanks and hits above, misses just now.
        Ok(results.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider that counts how many texts it was asked to embed.
    #[derive(Debug)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl EmbeddingProvider for CountingProvider {
        fn provider_name(&self) -> &str {
            "counting"
        }
        fn model_name(&self) -> &str {
            "counting-v1"
        }
        fn dimensions(&self) -> usize {
            4
        }
        async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
            self.calls.fetch_add(texts.len(), Ordering::SeqCst);
            Ok(texts.iter().map(|_| vec![1.0, 0.0, 0.0, 0.0]).collect())
        }
    }

    fn service_with_counter() -> (EmbeddingService, Arc<CountingProvider>) {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let config = AppConfig {
            embedding_dimensions: 4,
            ..AppConfig::default()
        };
        let cache = Arc::new(MemoryCache::new(true));
        let service = EmbeddingService::with_provider(provider.clone(), config, cache);
        (service, provider)
    }

    #[test]
    fn test_similarity_identical_vectors() {
        let v = vec![0.5, 0.5, 0.0];
        assert!((similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_similarity_opposite_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        assert!(similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_similarity_orthogonal_is_half() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!((similarity(&a, &b) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_similarity_zero_norm_is_zero() {
        let zero = vec![0.0, 0.0];
        let v = vec![1.0, 0.0];
        assert_eq!(similarity(&zero, &v), 0.0);
        assert_eq!(similarity(&v, &zero), 0.0);
    }

    #[tokio::test]
    async fn test_embed_blank_is_zero_vector() {
        let (service, provider) = service_with_counter();
        let embedding = service.embed("  ").await.unwrap();
        assert_eq!(embedding, vec![0.0; 4]);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_embed_caches_repeat_calls() {
        let (service, provider) = service_with_counter();
        let first = service.embed("수강신청").await.unwrap();
        let second = service.embed("수강신청").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_embed_batch_only_sends_misses() {
        let (service, provider) = service_with_counter();
        service.embed("휴학").await.unwrap();

        let texts = vec!["휴학".to_string(), "".to_string(), "복학".to_string()];
        let embeddings = service.embed_batch(&texts).await.unwrap();

        assert_eq!(embeddings.len(), 3);
        assert_eq!(embeddings[1], vec![0.0; 4]);
        // "휴학" was cached, "" is blank: only "복학" reaches the provider.
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_disabled_cache_still_embeds() {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let config = AppConfig {
            embedding_dimensions: 4,
            cache_enabled: false,
            ..AppConfig::default()
        };
        let cache = Arc::new(MemoryCache::disabled());
        let service = EmbeddingService::with_provider(provider.clone(), config, cache);

        service.embed("성적").await.unwrap();
        service.embed("성적").await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }
}
