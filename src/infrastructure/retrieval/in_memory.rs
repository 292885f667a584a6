//! In-memory retriever for development and testing

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{DocumentRetriever, DomainError};

/// In-memory passage store with term-overlap scoring
///
/// Stands in for the external vector store during development and in tests.
/// Scoring is the fraction of query terms found in the passage, so ordering
/// is deterministic for a given corpus.
#[derive(Debug, Default)]
pub struct InMemoryRetriever {
    passages: Arc<RwLock<Vec<String>>>,
}

impl InMemoryRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_passages(passages: Vec<&str>) -> Self {
        Self {
            passages: Arc::new(RwLock::new(
                passages.into_iter().map(String::from).collect(),
            )),
        }
    }

    /// Add a passage to the store
    pub async fn add_passage(&self, passage: impl Into<String>) {
        self.passages.write().await.push(passage.into());
    }

    fn score(query_terms: &[String], passage: &str) -> f32 {
        if query_terms.is_empty() {
            return 0.0;
        }

        let passage_lower = passage.to_lowercase();
        let hits = query_terms
            .iter()
            .filter(|term| passage_lower.contains(term.as_str()))
            .count();

        hits as f32 / query_terms.len() as f32
    }
}

#[async_trait]
impl DocumentRetriever for InMemoryRetriever {
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<String>, DomainError> {
        let query_terms: Vec<String> = query
            .to_lowercase()
            .split_whitespace()
            .map(String::from)
            .collect();

        let passages = self.passages.read().await;

        let mut scored: Vec<(f32, &String)> = passages
            .iter()
            .map(|p| (Self::score(&query_terms, p), p))
            .filter(|(score, _)| *score > 0.0)
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(_, p)| p.clone())
            .collect())
    }

    fn retriever_name(&self) -> &'static str {
        "in_memory"
    }
}
