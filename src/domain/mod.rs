//! Domain layer - core types, errors, and collaborator traits

pub mod error;
pub mod graph;
pub mod llm;
pub mod retrieval;
pub mod workflow;

pub use error::DomainError;
pub use graph::{EntityRef, EntityStore};
pub use llm::{
    FinishReason, LlmProvider, LlmRequest, LlmRequestBuilder, LlmResponse, Message, MessageRole,
    Usage,
};
pub use retrieval::DocumentRetriever;
pub use workflow::{
    AnswerGenerator, AnswerGrader, BinaryGrade, GeneratedAnswer, GenerationVerdict,
    GradeResponse, GradedDocuments, RelevanceGrader, WorkflowState, DEFAULT_MAX_RETRIES,
    MAX_RETRIES_REACHED_MESSAGE, NO_RELEVANT_DOCUMENTS_MESSAGE,
};
