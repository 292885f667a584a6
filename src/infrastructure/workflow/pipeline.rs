//! QA pipeline orchestrator: the answer quality control loop

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

use crate::domain::workflow::MAX_RETRIES_REACHED_MESSAGE;
use crate::domain::{
    AnswerGenerator, AnswerGrader, DocumentRetriever, DomainError, EntityStore,
    GenerationVerdict, RelevanceGrader, WorkflowState,
};

/// Pipeline step, consumed by the transition loop
///
/// Explicit states instead of string-keyed routing: a grading outcome can
/// only dispatch to a step that actually exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Retrieve,
    GradeDocuments,
    QueryEntities,
    Generate,
    GradeGeneration,
    DetermineOutput,
}

/// Orchestrates retrieval, grading, generation, and answer validation
///
/// Every collaborator is injected; the pipeline holds no global state and
/// concurrent questions run through independent [`WorkflowState`] values.
/// In normal operation [`QaPipeline::answer`] always resolves to `Ok` with
/// `output` populated; only unexpected collaborator failures (unreachable
/// retrieval service, oracle invocation failure, malformed answer grade)
/// surface as `Err`.
#[derive(Debug, Clone)]
pub struct QaPipeline {
    retriever: Arc<dyn DocumentRetriever>,
    relevance_grader: Arc<dyn RelevanceGrader>,
    generator: Arc<dyn AnswerGenerator>,
    answer_grader: Arc<dyn AnswerGrader>,
    entity_store: Option<Arc<dyn EntityStore>>,
    top_k: usize,
    max_retries: u32,
}

impl QaPipeline {
    pub fn new(
        retriever: Arc<dyn DocumentRetriever>,
        relevance_grader: Arc<dyn RelevanceGrader>,
        generator: Arc<dyn AnswerGenerator>,
        answer_grader: Arc<dyn AnswerGrader>,
        top_k: usize,
        max_retries: u32,
    ) -> Self {
        Self {
            retriever,
            relevance_grader,
            generator,
            answer_grader,
            entity_store: None,
            top_k,
            max_retries,
        }
    }

    /// Enable graph entity enrichment for generation prompts
    pub fn with_entity_store(mut self, store: Arc<dyn EntityStore>) -> Self {
        self.entity_store = Some(store);
        self
    }

    /// Wire the LLM-backed steps against Azure OpenAI from configuration
    pub fn from_config(
        config: &crate::config::AppConfig,
        retriever: Arc<dyn DocumentRetriever>,
    ) -> Result<Self, DomainError> {
        if config.azure_openai.endpoint.is_empty() {
            return Err(DomainError::configuration(
                "Azure OpenAI endpoint is not set",
            ));
        }

        let provider = Arc::new(crate::infrastructure::llm::AzureOpenAiProvider::new(
            Self::http_client(&config.azure_openai)?,
            config.azure_openai.clone(),
        ));
        let pipeline = &config.pipeline;

        Ok(Self::new(
            retriever,
            Arc::new(super::LlmRelevanceGrader::new(
                provider.clone(),
                &pipeline.model,
                pipeline.grading_temperature,
            )),
            Arc::new(super::LlmAnswerGenerator::new(
                provider.clone(),
                &pipeline.model,
                pipeline.max_context_entities,
            )),
            Arc::new(super::LlmAnswerGrader::new(
                provider,
                &pipeline.model,
                pipeline.grading_temperature,
            )),
            pipeline.top_k,
            pipeline.max_retries,
        ))
    }

    /// Oracle calls are bounded by the configured per-request timeout
    fn http_client(
        settings: &crate::config::AzureOpenAiSettings,
    ) -> Result<crate::infrastructure::http::HttpClient, DomainError> {
        crate::infrastructure::http::HttpClient::with_timeout(Duration::from_secs(
            settings.request_timeout_secs,
        ))
    }

    /// Answer a question, returning the terminal workflow state
    pub async fn answer(&self, question: impl Into<String>) -> Result<WorkflowState, DomainError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("qa_pipeline", %run_id);

        self.run(WorkflowState::new(question, self.max_retries))
            .instrument(span)
            .await
    }

    async fn run(&self, mut state: WorkflowState) -> Result<WorkflowState, DomainError> {
        let mut step = Step::Retrieve;
        // The grading step's own signal is the single source of truth for
        // the retries-exhausted condition; DetermineOutput never recomputes
        // it from loop_step.
        let mut last_verdict: Option<GenerationVerdict> = None;

        loop {
            step = match step {
                Step::Retrieve => {
                    state.documents = self
                        .retriever
                        .retrieve(&state.question, self.top_k)
                        .await?;

                    debug!("Retrieved {} documents", state.documents.len());
                    Step::GradeDocuments
                }

                Step::GradeDocuments => {
                    let graded = self
                        .relevance_grader
                        .grade_documents(&state.question, &state.documents)
                        .await?;

                    state.documents = graded.documents;
                    state.error = graded.error;

                    if state.error.is_some() {
                        Step::DetermineOutput
                    } else if self.entity_store.is_some() {
                        Step::QueryEntities
                    } else {
                        Step::Generate
                    }
                }

                Step::QueryEntities => {
                    // Enrichment only: a failing store degrades to empty
                    // entity context and the run continues.
                    if let Some(ref store) = self.entity_store {
                        match store.query_semantically(&state.question).await {
                            Ok(entities) => {
                                debug!("Entity store returned {} entities", entities.len());
                                state.entities = entities;
                            }
                            Err(e) => {
                                warn!("Entity query failed, continuing without entities: {}", e);
                                state.entity_error = Some(format!("Entity query failed: {}", e));
                            }
                        }
                    }

                    Step::Generate
                }

                Step::Generate => {
                    let generated = self
                        .generator
                        .generate(
                            &state.question,
                            &state.documents,
                            &state.entities,
                            state.loop_step,
                        )
                        .await?;

                    state.draft_answer = Some(generated.answer);
                    state.loop_step = generated.loop_step;
                    Step::GradeGeneration
                }

                Step::GradeGeneration => {
                    let answer = state.draft_answer.as_deref().ok_or_else(|| {
                        DomainError::internal("Answer grading reached without a draft answer")
                    })?;

                    let verdict = self
                        .answer_grader
                        .grade(
                            &state.question,
                            &state.documents,
                            answer,
                            state.loop_step,
                            state.max_retries,
                        )
                        .await?;

                    debug!(loop_step = state.loop_step, ?verdict, "Generation graded");
                    last_verdict = Some(verdict);

                    if verdict.should_retry() {
                        Step::Generate
                    } else {
                        Step::DetermineOutput
                    }
                }

                Step::DetermineOutput => {
                    let output = if let Some(ref error) = state.error {
                        error.clone()
                    } else if last_verdict == Some(GenerationVerdict::MaxRetriesReached) {
                        MAX_RETRIES_REACHED_MESSAGE.to_string()
                    } else {
                        state.draft_answer.clone().ok_or_else(|| {
                            DomainError::internal("Terminal state without error or draft answer")
                        })?
                    };

                    info!(
                        loop_step = state.loop_step,
                        fallback = state.error.is_some()
                            || last_verdict == Some(GenerationVerdict::MaxRetriesReached),
                        "Workflow terminal"
                    );

                    state.output = Some(output);
                    return Ok(state);
                }
            };
        }
    }
}
