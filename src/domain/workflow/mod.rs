//! Workflow state, grading contracts, and pipeline step traits

mod grading;
mod state;
mod steps;

pub use grading::{BinaryGrade, GenerationVerdict, GradeResponse};
pub use state::{
    WorkflowState, DEFAULT_MAX_RETRIES, MAX_RETRIES_REACHED_MESSAGE,
    NO_RELEVANT_DOCUMENTS_MESSAGE,
};
pub use steps::{AnswerGenerator, AnswerGrader, GeneratedAnswer, GradedDocuments, RelevanceGrader};

#[cfg(test)]
pub use steps::mock::{MockAnswerGenerator, MockAnswerGrader, MockRelevanceGrader};
