//! Pipeline step implementations and the orchestrator

mod answer_grader;
mod generator;
mod pipeline;
pub mod prompts;
mod relevance;

pub use answer_grader::LlmAnswerGrader;
pub use generator::LlmAnswerGenerator;
pub use pipeline::QaPipeline;
pub use relevance::LlmRelevanceGrader;

#[cfg(test)]
mod tests {
    //! End-to-end scenarios over the LLM-backed steps and a shared mock
    //! oracle; responses are queued in the exact order the pipeline calls
    //! the provider.

    use std::sync::Arc;

    use super::*;
    use crate::domain::llm::MockLlmProvider;
    use crate::domain::workflow::NO_RELEVANT_DOCUMENTS_MESSAGE;
    use crate::infrastructure::retrieval::InMemoryRetriever;

    const GRADE_YES: &str = r#"{"binary_score": "yes", "explanation": "ok"}"#;
    const GRADE_NO: &str = r#"{"binary_score": "no", "explanation": "off topic"}"#;

    fn wire(provider: Arc<MockLlmProvider>, retriever: InMemoryRetriever) -> QaPipeline {
        QaPipeline::new(
            Arc::new(retriever),
            Arc::new(LlmRelevanceGrader::new(provider.clone(), "gpt-4o", 0.0)),
            Arc::new(LlmAnswerGenerator::new(provider.clone(), "gpt-4o", 5)),
            Arc::new(LlmAnswerGrader::new(provider, "gpt-4o", 0.0)),
            5,
            3,
        )
    }

    #[tokio::test]
    async fn test_capital_of_france_end_to_end() {
        let provider = Arc::new(
            MockLlmProvider::new("mock")
                .with_response(GRADE_YES) // document relevance
                .with_response("Paris is the capital of France.") // generation
                .with_response(GRADE_YES) // grounding
                .with_response(GRADE_YES), // usefulness
        );
        let retriever = InMemoryRetriever::with_passages(vec!["Paris is the capital of France."]);

        let state = wire(provider, retriever)
            .answer("What is the capital of France?")
            .await
            .unwrap();

        assert!(state.output.as_deref().unwrap().contains("Paris"));
        assert_eq!(state.loop_step, 1);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_oracle_outage_fails_the_run_instead_of_falling_back() {
        // A provider outage during relevance grading must surface as an
        // error; reporting it as the no-relevant-documents fallback would
        // hide the outage from the caller.
        let provider = Arc::new(MockLlmProvider::new("mock").with_error("service unavailable"));
        let retriever = InMemoryRetriever::with_passages(vec!["Paris is the capital of France."]);

        let result = wire(provider, retriever)
            .answer("What is the capital of France?")
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_irrelevant_corpus_end_to_end() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_response(GRADE_NO));
        let retriever =
            InMemoryRetriever::with_passages(vec!["Unrelated text about cooking recipes."]);

        let state = wire(provider, retriever)
            .answer("Tell me about cooking geography")
            .await
            .unwrap();

        assert_eq!(state.output.as_deref(), Some(NO_RELEVANT_DOCUMENTS_MESSAGE));
        assert!(state.documents.is_empty());
    }
}
