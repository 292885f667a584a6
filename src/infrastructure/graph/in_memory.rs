//! In-memory entity store for development and testing

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{DomainError, EntityRef, EntityStore};

/// In-memory entity store
///
/// Matches entities whose id or description shares a term with the
/// question, ordered by descending relevance score.
#[derive(Debug, Default)]
pub struct InMemoryEntityStore {
    entities: Arc<RwLock<Vec<EntityRef>>>,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entities(entities: Vec<EntityRef>) -> Self {
        Self {
            entities: Arc::new(RwLock::new(entities)),
        }
    }

    /// Add an entity to the store
    pub async fn add_entity(&self, entity: EntityRef) {
        self.entities.write().await.push(entity);
    }

    fn matches(question_lower: &str, entity: &EntityRef) -> bool {
        let id_lower = entity.id.to_lowercase();
        let desc_lower = entity.description.to_lowercase();

        id_lower
            .split_whitespace()
            .chain(desc_lower.split_whitespace())
            .any(|term| question_lower.contains(term))
    }
}

#[async_trait]
impl EntityStore for InMemoryEntityStore {
    async fn query_semantically(&self, question: &str) -> Result<Vec<EntityRef>, DomainError> {
        let question_lower = question.to_lowercase();
        let entities = self.entities.read().await;

        let mut matched: Vec<EntityRef> = entities
            .iter()
            .filter(|e| Self::matches(&question_lower, e))
            .cloned()
            .collect();

        matched.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(matched)
    }

    fn store_name(&self) -> &'static str {
        "in_memory"
    }
}
