//! Trigram embedding provider using character trigram-based content-aware embeddings.

use crate::embeddings::provider::EmbeddingProvider;
use campus_core::{AppError, AppResult};
use std::collections::HashMap;

/// Trigram-based embedding provider for local, offline operation.
///
/// Generates deterministic embeddings from character trigrams and word
/// frequencies. Not semantically accurate like neural models, but it
/// produces consistent, content-dependent vectors without any external
/// service, and it works on Korean text since it operates on characters
/// rather than a fixed vocabulary.
#[derive(Debug)]
pub struct TrigramProvider {
    dimensions: usize,
}

impl TrigramProvider {
    /// Create a new trigram provider with specified dimensions.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

fn trigram_embedding(text: &str, dimensions: usize) -> Vec<f32> {
    let mut embedding = vec![0.0; dimensions];
    let lower = text.to_lowercase();

    // Single-character tokens carry almost no signal in Korean or English.
    let words: Vec<&str> = lower
        .split_whitespace()
        .filter(|w| w.chars().count() > 1)
        .collect();

    let mut word_freq: HashMap<&str, u32> = HashMap::new();
    for word in &words {
        *word_freq.entry(word).or_insert(0) += 1;
    }

    for (word, freq) in &word_freq {
        // Character trigrams spread each word across several dimensions.
        let chars: Vec<char> = word.chars().collect();
        for window in chars.windows(3) {
            let mut hash = 0u64;
            for ch in window {
                hash = hash.wrapping_mul(37).wrapping_add(*ch as u64);
            }
            embedding[(hash as usize) % dimensions] += (*freq as f32).sqrt();
        }

        // Also encode the whole word.
        let word_hash = word
            .bytes()
            .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        embedding[(word_hash as usize) % dimensions] += *freq as f32;
    }

    // Normalize to unit vector; empty input stays all-zero.
    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in &mut embedding {
            *v /= norm;
        }
    }

    embedding
}

#[async_trait::async_trait]
impl EmbeddingProvider for TrigramProvider {
    fn provider_name(&self) -> &str {
        "trigram"
    }

    fn model_name(&self) -> &str {
        "trigram-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        // CPU-bound work; keep it off the async worker threads.
        let texts = texts.to_vec();
        let dimensions = self.dimensions;
        tokio::task::spawn_blocking(move || {
            texts
                .iter()
                .map(|text| trigram_embedding(text, dimensions))
                .collect()
        })
        .await
        .map_err(|e| AppError::Embedding(format!("Embedding task failed: {}", e)))
    }
}
