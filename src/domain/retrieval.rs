//! Semantic retrieval collaborator trait

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Trait for semantic passage retrieval
///
/// Implementations query an external vector store. Results are ordered by
/// descending similarity and never exceed `top_k`. No internal retry;
/// failures propagate to the caller.
#[async_trait]
pub trait DocumentRetriever: Send + Sync + Debug {
    /// Retrieve the passages most similar to `query`
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<String>, DomainError>;

    /// Get the retriever name
    fn retriever_name(&self) -> &'static str;
}
