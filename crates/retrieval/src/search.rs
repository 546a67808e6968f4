//! Keyword, vector, and hybrid search over the category stores.
//!
//! All three entry points share the result cache and return results in a
//! deterministic order: score descending, then document id, then category
//! rank. Vector search degrades to keyword search when embedding fails;
//! it never surfaces an embedding error to the caller.

use crate::embeddings::EmbeddingService;
use crate::store::DocumentStore;
use crate::types::{Category, SearchResult};
use campus_core::{AppResult, MemoryCache};
use futures::future::try_join_all;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const CACHE_NAMESPACE: &str = "search";

/// Keyword weight in hybrid fusion; keyword relevance is divided by this
/// before weighting so a handful of term hits lands in the same range as
/// similarity.
const KEYWORD_WEIGHT: f32 = 0.4;
const VECTOR_WEIGHT: f32 = 0.6;
const RELEVANCE_SCALE: f32 = 10.0;

#[derive(Serialize)]
struct SearchKey<'a> {
    query: &'a str,
    category: Option<Category>,
    limit: usize,
    mode: &'static str,
}

pub struct SearchEngine {
    stores: Vec<Arc<dyn DocumentStore>>,
    embeddings: Arc<EmbeddingService>,
    cache: Arc<MemoryCache>,
    search_ttl: Duration,
}

impl SearchEngine {
    pub fn new(
        stores: Vec<Arc<dyn DocumentStore>>,
        embeddings: Arc<EmbeddingService>,
        cache: Arc<MemoryCache>,
        search_ttl_secs: u64,
    ) -> Self {
        Self {
            stores,
            embeddings,
            cache,
            search_ttl: Duration::from_secs(search_ttl_secs),
        }
    }

    /// Stores a search with this category filter touches. `None` and
    /// `Some(Other)` both mean "no filter": every store participates.
    fn applicable_stores(&self, category: Option<Category>) -> Vec<&Arc<dyn DocumentStore>> {
        match category {
            Some(cat) if cat != Category::Other => self
                .stores
                .iter()
                .filter(|store| store.category() == cat)
                .collect(),
            _ => self.stores.iter().collect(),
        }
    }

    /// Per-store keyword fetch budget. Unfiltered keyword searches split
    /// the limit evenly across the four categories; integer division drops
    /// the remainder, so e.g. `limit = 5` fetches one document per
    /// category. Vector search does not split: stores rank with the full
    /// limit and the merged list is truncated.
    fn per_store_limit(limit: usize, store_count: usize) -> usize {
        if store_count <= 1 {
            limit
        } else {
            limit / store_count
        }
    }

    /// Term-occurrence relevance of a document against a query.
    ///
    /// Counts full-query substring occurrences in each text, plus one per
    /// query word (longer than two characters) contained in the text.
    pub fn relevance_score(query: &str, texts: &[&str]) -> u32 {
        let query = query.to_lowercase();
        let words: Vec<&str> = query
            .split_whitespace()
            .filter(|w| w.chars().count() > 2)
            .collect();

        let mut score = 0u32;
        for text in texts {
            let text = text.to_lowercase();
            score += text.matches(&query).count() as u32;
            for word in &words {
                if text.contains(word) {
                    score += 1;
                }
            }
        }
        score
    }

    fn cached(&self, key: &SearchKey<'_>) -> Option<Vec<SearchResult>> {
        self.cache
            .get::<Vec<SearchResult>>(CACHE_NAMESPACE, &MemoryCache::hash_key(key))
    }

    fn store_results(&self, key: &SearchKey<'_>, results: &Vec<SearchResult>) {
        self.cache.set(
            CACHE_NAMESPACE,
            &MemoryCache::hash_key(key),
            results,
            Some(self.search_ttl),
        );
    }

    /// Keyword search across the applicable stores.
    pub async fn keyword_search(
        &self,
        query: &str,
        category: Option<Category>,
        limit: usize,
    ) -> AppResult<Vec<SearchResult>> {
        let key = SearchKey {
            query,
            category,
            limit,
            mode: "keyword",
        };
        if let Some(cached) = self.cached(&key) {
            return Ok(cached);
        }

        let stores = self.applicable_stores(category);
        let per_store = Self::per_store_limit(limit, stores.len());

        let batches = try_join_all(
            stores
                .iter()
                .map(|store| store.find_by_keyword(query, per_store)),
        )
        .await?;

        let mut results: Vec<SearchResult> = batches
            .into_iter()
            .flatten()
            .map(|doc| {
                let mut result = SearchResult::from_document(&doc);
                result.relevance_score =
                    Self::relevance_score(query, &[&doc.title, &doc.body]);
                result
            })
            .collect();

        results.sort_by_key(|r| (Reverse(r.relevance_score), r.id, r.category.rank()));
        results.truncate(limit);

        debug!(query, count = results.len(), "Keyword search complete");
        self.store_results(&key, &results);
        Ok(results)
    }

    /// Vector search across the applicable stores. On any embedding or
    /// store failure this degrades to keyword search for the same
    /// query/category/limit rather than failing the request.
    pub async fn vector_search(
        &self,
        query: &str,
        category: Option<Category>,
        limit: usize,
    ) -> AppResult<Vec<SearchResult>> {
        let key = SearchKey {
            query,
            category,
            limit,
            mode: "vector",
        };
        if let Some(cached) = self.cached(&key) {
            return Ok(cached);
        }

        match self.vector_search_inner(query, category, limit).await {
            Ok(results) => {
                debug!(query, count = results.len(), "Vector search complete");
                self.store_results(&key, &results);
                Ok(results)
            }
            Err(e) => {
                warn!(query, error = %e, "Vector search failed, degrading to keyword search");
                self.keyword_search(query, category, limit).await
            }
        }
    }

    async fn vector_search_inner(
        &self,
        query: &str,
        category: Option<Category>,
        limit: usize,
    ) -> AppResult<Vec<SearchResult>> {
        let query_embedding = self.embeddings.embed(query).await?;

        // Unlike keyword search, every store ranks with the full limit;
        // the merged list is truncated afterwards.
        let stores = self.applicable_stores(category);

        let batches = try_join_all(
            stores
                .iter()
                .map(|store| store.find_by_vector(&query_embedding, limit)),
        )
        .await?;

        let mut results: Vec<SearchResult> = batches
            .into_iter()
            .flatten()
            .map(|(doc, score)| {
                let mut result = SearchResult::from_document(&doc);
                result.similarity = score;
                result
            })
            .collect();

        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.id.cmp(&b.id))
                .then(a.category.rank().cmp(&b.category.rank()))
        });
        results.truncate(limit);
        Ok(results)
    }

    /// Hybrid search: both legs run over a widened candidate pool, results
    /// are merged on (category, id), and each merged hit is scored
    /// `0.4 * relevance/10 + 0.6 * similarity`. The fused score is left
    /// unclamped; dense keyword matches may exceed 1.0.
    pub async fn hybrid_search(
        &self,
        query: &str,
        category: Option<Category>,
        limit: usize,
    ) -> AppResult<Vec<SearchResult>> {
        let key = SearchKey {
            query,
            category,
            limit,
            mode: "hybrid",
        };
        if let Some(cached) = self.cached(&key) {
            return Ok(cached);
        }

        let pool = limit * 2;
        let (keyword, vector) = tokio::join!(
            self.keyword_search(query, category, pool),
            self.vector_search(query, category, pool),
        );
        let keyword = keyword?;
        let vector = vector?;

        let mut merged: HashMap<(Category, i64), SearchResult> = HashMap::new();
        for result in keyword {
            merged.insert(result.key(), result);
        }
        for result in vector {
            match merged.get_mut(&result.key()) {
                Some(existing) => existing.similarity = result.similarity,
                None => {
                    merged.insert(result.key(), result);
                }
            }
        }

        let mut results: Vec<SearchResult> = merged
            .into_values()
            .map(|mut result| {
                result.final_score = KEYWORD_WEIGHT
                    * (result.relevance_score as f32 / RELEVANCE_SCALE)
                    + VECTOR_WEIGHT * result.similarity;
                result
            })
            .collect();

        results.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.id.cmp(&b.id))
                .then(a.category.rank().cmp(&b.category.rank()))
        });
        results.truncate(limit);

        debug!(query, count = results.len(), "Hybrid search complete");
        self.store_results(&key, &results);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relevance_counts_full_query_occurrences() {
        let score = SearchEngine::relevance_score("등록금", &["등록금 안내", "등록금 납부는 등록금 고지서로"]);
        // 1 occurrence in title + 2 in body, plus the word itself (3 chars)
        // contained in each text.
        assert_eq!(score, 5);
    }

    #[test]
    fn test_relevance_ignores_short_words() {
        // "휴학" is two characters: no per-word bonus, only whole-query matches.
        let score = SearchEngine::relevance_score("휴학", &["휴학 신청"]);
        assert_eq!(score, 1);
    }

    #[test]
    fn test_relevance_no_match_is_zero() {
        assert_eq!(SearchEngine::relevance_score("셔틀버스", &["수강신청 안내"]), 0);
    }

    #[test]
    fn test_per_store_limit_drops_remainder() {
        assert_eq!(SearchEngine::per_store_limit(5, 4), 1);
        assert_eq!(SearchEngine::per_store_limit(8, 4), 2);
        assert_eq!(SearchEngine::per_store_limit(3, 4), 0);
        assert_eq!(SearchEngine::per_store_limit(5, 1), 5);
    }
}
