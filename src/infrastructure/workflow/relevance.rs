//! LLM-backed document relevance grader

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, warn};

use super::prompts;
use crate::domain::workflow::NO_RELEVANT_DOCUMENTS_MESSAGE;
use crate::domain::{
    DomainError, GradeResponse, GradedDocuments, LlmProvider, LlmRequest, RelevanceGrader,
};

/// Grades each retrieved passage independently with a binary oracle call
///
/// Documents are graded concurrently; kept documents preserve input order.
/// A malformed grade excludes only the affected document (fail-safe "no"),
/// never the whole batch. Oracle invocation failures are not fail-safe:
/// they propagate, so a service outage is never reported as an ordinary
/// no-relevant-documents fallback.
#[derive(Debug)]
pub struct LlmRelevanceGrader<P: LlmProvider> {
    provider: Arc<P>,
    model: String,
    temperature: f32,
}

impl<P: LlmProvider> LlmRelevanceGrader<P> {
    pub fn new(provider: Arc<P>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
        }
    }

    /// Grade a single document; returns whether to keep it
    ///
    /// Only a malformed grading response is fail-safe "no"; a failed
    /// oracle invocation propagates.
    async fn is_relevant(&self, question: &str, document: &str) -> Result<bool, DomainError> {
        let request = LlmRequest::builder()
            .system(prompts::DOC_GRADER_INSTRUCTIONS)
            .user(prompts::doc_grader_prompt(document, question))
            .temperature(self.temperature)
            .build();

        let response = self.provider.chat(&self.model, request).await?;

        match GradeResponse::parse(response.content()) {
            Ok(grade) => {
                debug!(
                    relevant = grade.binary_score.is_yes(),
                    "Document graded: {}", grade.explanation
                );
                Ok(grade.binary_score.is_yes())
            }
            Err(e) => {
                warn!("Malformed relevance grade, excluding document: {}", e);
                Ok(false)
            }
        }
    }
}

#[async_trait]
impl<P: LlmProvider> RelevanceGrader for LlmRelevanceGrader<P> {
    async fn grade_documents(
        &self,
        question: &str,
        documents: &[String],
    ) -> Result<GradedDocuments, DomainError> {
        debug!("Grading {} documents for relevance", documents.len());

        let grades = join_all(
            documents
                .iter()
                .map(|doc| self.is_relevant(question, doc)),
        )
        .await;

        let mut kept = Vec::with_capacity(documents.len());
        for (doc, relevant) in documents.iter().zip(grades) {
            if relevant? {
                kept.push(doc.clone());
            }
        }

        let error = if kept.is_empty() {
            debug!("No relevant documents kept");
            Some(NO_RELEVANT_DOCUMENTS_MESSAGE.to_string())
        } else {
            None
        };

        Ok(GradedDocuments {
            documents: kept,
            error,
        })
    }
}
