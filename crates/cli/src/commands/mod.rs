//! Command handlers and shared engine wiring.

mod ask;
mod search;

pub use ask::AskCommand;
pub use search::SearchCommand;

use campus_core::{config::AppConfig, AppResult, MemoryCache};
use campus_retrieval::{
    load_corpus, stores_from_documents, EmbeddingService, SearchEngine,
};
use std::path::Path;
use std::sync::Arc;

/// Load the corpus, embed any documents missing an embedding, and build
/// the search engine around one shared cache.
pub(crate) async fn build_engine(
    config: &AppConfig,
    data: &Path,
) -> AppResult<Arc<SearchEngine>> {
    let mut documents = load_corpus(data)?;

    let cache = Arc::new(MemoryCache::new(config.cache_enabled));
    let embeddings = Arc::new(EmbeddingService::new(config.clone(), cache.clone()));

    let missing: Vec<usize> = documents
        .iter()
        .enumerate()
        .filter(|(_, doc)| doc.embedding.is_none())
        .map(|(i, _)| i)
        .collect();

    if !missing.is_empty() {
        tracing::info!(count = missing.len(), "Embedding corpus documents");
        let texts: Vec<String> = missing
            .iter()
            .map(|&i| documents[i].embedding_text())
            .collect();
        let vectors = embeddings.embed_batch(&texts).await?;
        for (&i, vector) in missing.iter().zip(vectors) {
            documents[i].embedding = Some(vector);
        }
    }

    Ok(Arc::new(SearchEngine::new(
        stores_from_documents(documents),
        embeddings,
        cache,
        config.cache_ttl_search,
    )))
}
