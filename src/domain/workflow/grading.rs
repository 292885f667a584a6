//! Structured grading output from the oracle and verdict types

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Binary classification from a grading oracle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinaryGrade {
    Yes,
    No,
}

impl BinaryGrade {
    pub fn is_yes(self) -> bool {
        self == Self::Yes
    }
}

/// Structured response expected from grading calls
///
/// The oracle is instructed to return a JSON object with a `binary_score`
/// of "yes" or "no" and an `explanation`.
#[derive(Debug, Clone, Deserialize)]
pub struct GradeResponse {
    pub binary_score: BinaryGrade,
    #[serde(default)]
    pub explanation: String,
}

impl GradeResponse {
    /// Parse a grading response from raw completion text
    ///
    /// Tolerates surrounding prose and markdown fencing by extracting the
    /// outermost JSON object before deserializing.
    pub fn parse(text: &str) -> Result<Self, DomainError> {
        let json_str = extract_json(text).unwrap_or(text);

        serde_json::from_str(json_str).map_err(|e| {
            DomainError::validation(format!("Malformed grading response: {} - {}", e, text))
        })
    }
}

/// Extract the outermost JSON object from a string
fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;

    if start < end {
        Some(&text[start..=end])
    } else {
        None
    }
}

/// Outcome of the two-stage answer grading step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationVerdict {
    /// Grounded in the documents and addresses the question; terminal
    Useful,
    /// Grounded but does not address the question; retry generation
    NotUseful,
    /// Not grounded in the documents; retry generation
    NotSupported,
    /// Retry budget exhausted; terminal
    MaxRetriesReached,
}

impl GenerationVerdict {
    /// Whether the orchestrator should loop back to generation
    pub fn should_retry(self) -> bool {
        matches!(self, Self::NotUseful | Self::NotSupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let grade =
            GradeResponse::parse(r#"{"binary_score": "yes", "explanation": "Relevant"}"#).unwrap();

        assert_eq!(grade.binary_score, BinaryGrade::Yes);
        assert_eq!(grade.explanation, "Relevant");
    }

    #[test]
    fn test_parse_json_in_markdown_fence() {
        let text = "```json\n{\"binary_score\": \"no\", \"explanation\": \"Off topic\"}\n```";
        let grade = GradeResponse::parse(text).unwrap();

        assert_eq!(grade.binary_score, BinaryGrade::No);
    }

    #[test]
    fn test_parse_json_with_surrounding_prose() {
        let text = r#"Here is my assessment: {"binary_score": "yes", "explanation": "ok"} Done."#;
        let grade = GradeResponse::parse(text).unwrap();

        assert!(grade.binary_score.is_yes());
    }

    #[test]
    fn test_parse_missing_explanation_defaults_empty() {
        let grade = GradeResponse::parse(r#"{"binary_score": "no"}"#).unwrap();

        assert_eq!(grade.binary_score, BinaryGrade::No);
        assert_eq!(grade.explanation, "");
    }

    #[test]
    fn test_parse_malformed_is_error() {
        assert!(GradeResponse::parse("not json at all").is_err());
        assert!(GradeResponse::parse(r#"{"binary_score": "maybe"}"#).is_err());
        assert!(GradeResponse::parse("").is_err());
    }

    #[test]
    fn test_verdict_retry_edges() {
        assert!(GenerationVerdict::NotUseful.should_retry());
        assert!(GenerationVerdict::NotSupported.should_retry());
        assert!(!GenerationVerdict::Useful.should_retry());
        assert!(!GenerationVerdict::MaxRetriesReached.should_retry());
    }
}
