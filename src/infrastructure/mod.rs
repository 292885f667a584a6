//! Infrastructure layer - concrete implementations of domain traits

pub mod graph;
pub mod http;
pub mod llm;
pub mod observability;
pub mod retrieval;
pub mod workflow;

pub use graph::InMemoryEntityStore;
pub use http::{HttpClient, HttpClientTrait};
pub use llm::AzureOpenAiProvider;
pub use observability::init_tracing;
pub use retrieval::InMemoryRetriever;
pub use workflow::{
    LlmAnswerGenerator, LlmAnswerGrader, LlmRelevanceGrader, QaPipeline,
};
