//! Pipeline step traits: relevance grading, generation, answer grading

use async_trait::async_trait;
use std::fmt::Debug;

use super::grading::GenerationVerdict;
use crate::domain::graph::EntityRef;
use crate::domain::DomainError;

/// Result of grading retrieved documents for relevance
#[derive(Debug, Clone)]
pub struct GradedDocuments {
    /// Documents classified relevant, input order preserved
    pub documents: Vec<String>,
    /// Set to the fixed fallback message when no document was kept
    pub error: Option<String>,
}

/// Result of one generation attempt
#[derive(Debug, Clone)]
pub struct GeneratedAnswer {
    /// Raw answer text from the oracle
    pub answer: String,
    /// The caller's loop step plus one
    pub loop_step: u32,
}

/// Classifies each retrieved passage as relevant or not to the question
#[async_trait]
pub trait RelevanceGrader: Send + Sync + Debug {
    /// Grade documents independently, keeping only the relevant ones
    ///
    /// A malformed grade for one document excludes only that document.
    /// An empty filtered set carries the fallback error message.
    async fn grade_documents(
        &self,
        question: &str,
        documents: &[String],
    ) -> Result<GradedDocuments, DomainError>;
}

/// Produces a draft answer from the question and relevant passages
#[async_trait]
pub trait AnswerGenerator: Send + Sync + Debug {
    /// Generate an answer; returns `loop_step + 1`
    ///
    /// No internal retry. Oracle failures propagate; the orchestrator
    /// decides whether to invoke generation again.
    async fn generate(
        &self,
        question: &str,
        documents: &[String],
        entities: &[EntityRef],
        loop_step: u32,
    ) -> Result<GeneratedAnswer, DomainError>;
}

/// Two-stage answer validation: grounding first, then usefulness
#[async_trait]
pub trait AnswerGrader: Send + Sync + Debug {
    /// Grade a draft answer against the documents and the question
    ///
    /// An answer failing the grounding check is never evaluated for
    /// usefulness in the same pass. A malformed grading response is a hard
    /// error because it gates termination.
    async fn grade(
        &self,
        question: &str,
        documents: &[String],
        answer: &str,
        loop_step: u32,
        max_retries: u32,
    ) -> Result<GenerationVerdict, DomainError>;
}


#[cfg(test)]
mod tests {
    use super::mock::*;
    use super::*;
    use crate::domain::workflow::state::NO_RELEVANT_DOCUMENTS_MESSAGE;

    #[tokio::test]
    async fn test_mock_relevance_grader_drop_all_sets_error() {
        let grader = MockRelevanceGrader::drop_all();
        let docs = vec!["doc".to_string()];

        let graded = grader.grade_documents("q", &docs).await.unwrap();

        assert!(graded.documents.is_empty());
        assert_eq!(graded.error.as_deref(), Some(NO_RELEVANT_DOCUMENTS_MESSAGE));
    }

    #[tokio::test]
    async fn test_mock_generator_increments_loop_step() {
        let generator = MockAnswerGenerator::answering("Paris.");

        let result = generator.generate("q", &[], &[], 2).await.unwrap();

        assert_eq!(result.answer, "Paris.");
        assert_eq!(result.loop_step, 3);
        assert_eq!(generator.attempts(), 1);
    }

    #[tokio::test]
    async fn test_mock_answer_grader_scripted_verdicts() {
        let grader = MockAnswerGrader::new()
            .then(GenerationVerdict::NotSupported)
            .then(GenerationVerdict::Useful);

        let first = grader.grade("q", &[], "a", 1, 3).await.unwrap();
        let second = grader.grade("q", &[], "a", 2, 3).await.unwrap();

        assert_eq!(first, GenerationVerdict::NotSupported);
        assert_eq!(second, GenerationVerdict::Useful);
    }

    #[tokio::test]
    async fn test_mock_answer_grader_gates_on_budget() {
        let grader = MockAnswerGrader::new().then(GenerationVerdict::NotUseful);

        // loop_step beyond max_retries downgrades to MaxRetriesReached
        let verdict = grader.grade("q", &[], "a", 4, 3).await.unwrap();

        assert_eq!(verdict, GenerationVerdict::MaxRetriesReached);
    }
}
