//! LLM-backed answer generator

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::prompts;
use crate::domain::{
    AnswerGenerator, DomainError, EntityRef, GeneratedAnswer, LlmProvider, LlmRequest,
};

/// Generates a draft answer from the question and the relevant passages
///
/// One oracle call per invocation, no internal retry; the orchestrator
/// decides whether to generate again.
#[derive(Debug)]
pub struct LlmAnswerGenerator<P: LlmProvider> {
    provider: Arc<P>,
    model: String,
    max_context_entities: usize,
}

impl<P: LlmProvider> LlmAnswerGenerator<P> {
    pub fn new(provider: Arc<P>, model: impl Into<String>, max_context_entities: usize) -> Self {
        Self {
            provider,
            model: model.into(),
            max_context_entities,
        }
    }

    fn build_prompt(&self, question: &str, documents: &[String], entities: &[EntityRef]) -> String {
        let documents_text = prompts::format_documents(documents);

        if entities.is_empty() {
            prompts::rag_prompt(&documents_text, question)
        } else {
            let entity_context = prompts::format_entities(entities, self.max_context_entities);
            prompts::rag_prompt_with_entities(&documents_text, &entity_context, question)
        }
    }
}

#[async_trait]
impl<P: LlmProvider> AnswerGenerator for LlmAnswerGenerator<P> {
    async fn generate(
        &self,
        question: &str,
        documents: &[String],
        entities: &[EntityRef],
        loop_step: u32,
    ) -> Result<GeneratedAnswer, DomainError> {
        let prompt = self.build_prompt(question, documents, entities);

        debug!(
            loop_step,
            documents = documents.len(),
            entities = entities.len(),
            "Generating answer"
        );

        let request = LlmRequest::builder().user(prompt).build();
        let response = self.provider.chat(&self.model, request).await?;

        Ok(GeneratedAnswer {
            answer: response.content().to_string(),
            loop_step: loop_step + 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::MockLlmProvider;

    fn docs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_generate_returns_answer_and_increments_loop_step() {
        let provider =
            Arc::new(MockLlmProvider::new("mock").with_response("Paris is the capital."));
        let generator = LlmAnswerGenerator::new(provider, "gpt-4o", 5);
        let documents = docs(&["Paris is the capital of France."]);

        let result = generator
            .generate("What is the capital of France?", &documents, &[], 0)
            .await
            .unwrap();

        assert_eq!(result.answer, "Paris is the capital.");
        assert_eq!(result.loop_step, 1);
    }

    #[tokio::test]
    async fn test_prompt_joins_documents_with_blank_line() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_response("ok"));
        let generator = LlmAnswerGenerator::new(provider.clone(), "gpt-4o", 5);
        let documents = docs(&["first passage", "second passage"]);

        generator
            .generate("question", &documents, &[], 0)
            .await
            .unwrap();

        let calls = provider.calls();
        let prompt = &calls[0].messages[0].content;

        assert!(prompt.contains("first passage\n\nsecond passage"));
        assert!(prompt.contains("question"));
    }

    #[tokio::test]
    async fn test_prompt_includes_entity_context_when_present() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_response("ok"));
        let generator = LlmAnswerGenerator::new(provider.clone(), "gpt-4o", 5);
        let documents = docs(&["doc"]);
        let entities = vec![EntityRef::new("Einstein", "Person", "Physicist", 0.9)];

        generator
            .generate("question", &documents, &entities, 2)
            .await
            .unwrap();

        let calls = provider.calls();
        let prompt = &calls[0].messages[0].content;

        assert!(prompt.contains("Relevant Entities"));
        assert!(prompt.contains("Einstein (Person)"));
    }

    #[tokio::test]
    async fn test_oracle_failure_propagates() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_error("timeout"));
        let generator = LlmAnswerGenerator::new(provider, "gpt-4o", 5);
        let documents = docs(&["doc"]);

        let result = generator.generate("question", &documents, &[], 0).await;

        assert!(result.is_err());
    }
}
