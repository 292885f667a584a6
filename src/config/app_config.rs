use serde::Deserialize;

use crate::domain::workflow::DEFAULT_MAX_RETRIES;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub azure_openai: AzureOpenAiSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tuning for the QA control loop
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Number of passages requested from the retriever
    pub top_k: usize,
    /// Additional generation attempts after the first
    pub max_retries: u32,
    /// Maximum entities included in the generation prompt
    pub max_context_entities: usize,
    /// Model (deployment) used for generation and grading
    pub model: String,
    /// Temperature for grading calls; kept low for stable classification
    pub grading_temperature: f32,
}

/// Connection settings for the Azure OpenAI oracle
#[derive(Debug, Clone, Deserialize)]
pub struct AzureOpenAiSettings {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Per-request timeout for oracle calls, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for AzureOpenAiSettings {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            api_version: default_api_version(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_api_version() -> String {
    "2024-02-01".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            max_retries: DEFAULT_MAX_RETRIES,
            max_context_entities: 5,
            model: "gpt-4o".to_string(),
            grading_temperature: 0.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("RAG_QA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
