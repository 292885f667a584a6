//! Two-stage LLM-backed answer grader: grounding first, then usefulness

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::prompts;
use crate::domain::{
    AnswerGrader, DomainError, GenerationVerdict, GradeResponse, LlmProvider, LlmRequest,
};

/// Validates a draft answer against the retrieved facts and the question
///
/// Stage 1 asks whether the answer is grounded in the documents only; an
/// unsupported answer is rejected before usefulness is even considered.
/// Stage 2 asks whether the answer addresses the question. Malformed
/// grading responses are hard errors since the verdict gates termination.
#[derive(Debug)]
pub struct LlmAnswerGrader<P: LlmProvider> {
    provider: Arc<P>,
    model: String,
    temperature: f32,
}

impl<P: LlmProvider> LlmAnswerGrader<P> {
    pub fn new(provider: Arc<P>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
        }
    }

    async fn ask(&self, instructions: &str, prompt: String) -> Result<GradeResponse, DomainError> {
        let request = LlmRequest::builder()
            .system(instructions)
            .user(prompt)
            .temperature(self.temperature)
            .build();

        let response = self.provider.chat(&self.model, request).await?;

        GradeResponse::parse(response.content())
    }
}

#[async_trait]
impl<P: LlmProvider> AnswerGrader for LlmAnswerGrader<P> {
    async fn grade(
        &self,
        question: &str,
        documents: &[String],
        answer: &str,
        loop_step: u32,
        max_retries: u32,
    ) -> Result<GenerationVerdict, DomainError> {
        let documents_text = prompts::format_documents(documents);

        let grounding = self
            .ask(
                prompts::GROUNDING_GRADER_INSTRUCTIONS,
                prompts::grounding_grader_prompt(&documents_text, answer),
            )
            .await?;

        if !grounding.binary_score.is_yes() {
            debug!(loop_step, "Answer not grounded: {}", grounding.explanation);

            return Ok(if loop_step <= max_retries {
                GenerationVerdict::NotSupported
            } else {
                GenerationVerdict::MaxRetriesReached
            });
        }

        let usefulness = self
            .ask(
                prompts::USEFULNESS_GRADER_INSTRUCTIONS,
                prompts::usefulness_grader_prompt(question, answer),
            )
            .await?;

        if usefulness.binary_score.is_yes() {
            debug!(loop_step, "Answer graded useful");
            return Ok(GenerationVerdict::Useful);
        }

        debug!(
            loop_step,
            "Answer does not address the question: {}", usefulness.explanation
        );

        Ok(if loop_step <= max_retries {
            GenerationVerdict::NotUseful
        } else {
            GenerationVerdict::MaxRetriesReached
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::MockLlmProvider;

    const YES: &str = r#"{"binary_score": "yes", "explanation": "Supported"}"#;
    const NO: &str = r#"{"binary_score": "no", "explanation": "Unsupported"}"#;

    fn docs() -> Vec<String> {
        vec!["Paris is the capital of France.".to_string()]
    }

    #[tokio::test]
    async fn test_grounded_and_useful() {
        let provider = Arc::new(
            MockLlmProvider::new("mock")
                .with_response(YES) // grounding
                .with_response(YES), // usefulness
        );
        let grader = LlmAnswerGrader::new(provider.clone(), "gpt-4o", 0.0);

        let verdict = grader
            .grade("capital?", &docs(), "Paris.", 1, 3)
            .await
            .unwrap();

        assert_eq!(verdict, GenerationVerdict::Useful);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_not_grounded_skips_usefulness_check() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_response(NO));
        let grader = LlmAnswerGrader::new(provider.clone(), "gpt-4o", 0.0);

        let verdict = grader
            .grade("capital?", &docs(), "Lyon.", 1, 3)
            .await
            .unwrap();

        assert_eq!(verdict, GenerationVerdict::NotSupported);
        // The usefulness oracle is never consulted for an unsupported answer
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_not_grounded_after_budget_is_max_retries() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_response(NO));
        let grader = LlmAnswerGrader::new(provider, "gpt-4o", 0.0);

        let verdict = grader
            .grade("capital?", &docs(), "Lyon.", 4, 3)
            .await
            .unwrap();

        assert_eq!(verdict, GenerationVerdict::MaxRetriesReached);
    }

    #[tokio::test]
    async fn test_grounded_but_not_useful() {
        let provider = Arc::new(
            MockLlmProvider::new("mock")
                .with_response(YES)
                .with_response(NO),
        );
        let grader = LlmAnswerGrader::new(provider, "gpt-4o", 0.0);

        let verdict = grader
            .grade("capital?", &docs(), "France is in Europe.", 2, 3)
            .await
            .unwrap();

        assert_eq!(verdict, GenerationVerdict::NotUseful);
    }

    #[tokio::test]
    async fn test_grounded_not_useful_after_budget_is_max_retries() {
        let provider = Arc::new(
            MockLlmProvider::new("mock")
                .with_response(YES)
                .with_response(NO),
        );
        let grader = LlmAnswerGrader::new(provider, "gpt-4o", 0.0);

        let verdict = grader
            .grade("capital?", &docs(), "France is in Europe.", 4, 3)
            .await
            .unwrap();

        assert_eq!(verdict, GenerationVerdict::MaxRetriesReached);
    }

    #[tokio::test]
    async fn test_malformed_grade_is_hard_error() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_response("no json here"));
        let grader = LlmAnswerGrader::new(provider, "gpt-4o", 0.0);

        let result = grader.grade("capital?", &docs(), "Paris.", 1, 3).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_oracle_failure_propagates() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_error("service down"));
        let grader = LlmAnswerGrader::new(provider, "gpt-4o", 0.0);

        let result = grader.grade("capital?", &docs(), "Paris.", 1, 3).await;

        assert!(result.is_err());
    }
}
