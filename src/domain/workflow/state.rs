//! Workflow state threaded through the QA control loop

use serde::{Deserialize, Serialize};

use crate::domain::graph::EntityRef;

/// Fallback message when the relevance grader keeps no documents
pub const NO_RELEVANT_DOCUMENTS_MESSAGE: &str = "No relevant documents found.";

/// Fallback message when generation retries are exhausted
pub const MAX_RETRIES_REACHED_MESSAGE: &str = "Max retries reached.";

/// Default number of additional generation attempts after the first
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Mutable state for a single question's pass through the pipeline
///
/// Created per incoming question, mutated by each step, and returned to the
/// caller once `output` is set. Nothing here is shared between concurrent
/// runs; abandoning a run mid-flight is just dropping the state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowState {
    /// The user question, immutable once set
    pub question: String,

    /// Retrieved passages; after grading, only the relevant ones remain
    pub documents: Vec<String>,

    /// Entities from the knowledge graph, if an entity store is configured
    #[serde(default)]
    pub entities: Vec<EntityRef>,

    /// Candidate answer, overwritten on each generation attempt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft_answer: Option<String>,

    /// Number of generation attempts so far; never reset within a run
    pub loop_step: u32,

    /// Maximum additional generation attempts after the first
    pub max_retries: u32,

    /// Set when no relevant documents were found; routes to fallback output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Annotation for a failed entity lookup; does not affect routing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_error: Option<String>,

    /// Terminal output, set exactly once by the last step before termination
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl WorkflowState {
    /// Create the initial state for a question
    pub fn new(question: impl Into<String>, max_retries: u32) -> Self {
        Self {
            question: question.into(),
            documents: Vec::new(),
            entities: Vec::new(),
            draft_answer: None,
            loop_step: 0,
            max_retries,
            error: None,
            entity_error: None,
            output: None,
        }
    }

    /// Whether the workflow has reached a terminal state
    pub fn is_terminal(&self) -> bool {
        self.output.is_some()
    }
}
