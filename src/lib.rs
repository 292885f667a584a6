//! Retrieval-Augmented QA Core
//!
//! A question-answering pipeline with a self-checking quality loop:
//! - Retrieves passages from a semantic store
//! - Grades each passage for relevance to the question
//! - Generates a candidate answer from the relevant passages
//! - Grades the answer for grounding and for usefulness
//! - Retries generation up to a bounded number of times, then falls
//!   back to a fixed message
//!
//! Ingestion, embedding computation, and vector/graph writes are external
//! collaborators behind the traits in [`domain`].

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{
    DomainError, EntityRef, GenerationVerdict, WorkflowState, MAX_RETRIES_REACHED_MESSAGE,
    NO_RELEVANT_DOCUMENTS_MESSAGE,
};
pub use infrastructure::workflow::QaPipeline;
