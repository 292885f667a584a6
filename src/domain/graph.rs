//! Entity graph collaborator trait and entity reference type

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::DomainError;

/// Reference to an entity retrieved from a knowledge graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRef {
    /// Entity identifier (usually its canonical name)
    pub id: String,
    /// Entity type, e.g. "Person" or "Organization"
    pub entity_type: String,
    /// Short description of the entity
    pub description: String,
    /// Semantic relevance to the question, in [0, 1]
    pub score: f32,
}

impl EntityRef {
    /// Create a new entity reference; the score is clamped to [0, 1]
    pub fn new(
        id: impl Into<String>,
        entity_type: impl Into<String>,
        description: impl Into<String>,
        score: f32,
    ) -> Self {
        Self {
            id: id.into(),
            entity_type: entity_type.into(),
            description: description.into(),
            score: score.clamp(0.0, 1.0),
        }
    }
}

/// Trait for semantic lookup of graph entities
///
/// Optional enrichment for answer generation. A failing store must not
/// abort the main workflow; the orchestrator degrades to empty entity
/// context and records the failure as an annotation.
#[async_trait]
pub trait EntityStore: Send + Sync + Debug {
    /// Find entities semantically related to the question
    async fn query_semantically(&self, question: &str) -> Result<Vec<EntityRef>, DomainError>;

    /// Get the store name
    fn store_name(&self) -> &'static str;
}
