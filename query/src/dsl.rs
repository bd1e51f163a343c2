use serde::{Deserialize, Serialize};
use thiserror::Error;
use triage_core::config::{RankingConfig, RankingConfigError};
use triage_core::error::{ErrorCode, TriageError};
use triage_core::model::ScoringPolicy;

const MAX_QUERY_CHARS: usize = 10_000;

/// A diagnosis request. Ranking fields left out fall back to the engine's
/// configured [`RankingConfig`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct DiagnosisRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_threshold: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<ScoringPolicy>,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RequestValidationError {
    #[error("query must be at most {0} characters")]
    QueryTooLong(usize),
    #[error(transparent)]
    Ranking(#[from] RankingConfigError),
}

impl TriageError for RequestValidationError {
    fn error_code(&self) -> ErrorCode {
        ErrorCode::InvalidArgument
    }
}

impl DiagnosisRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = Some(threshold);
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn with_policy(mut self, policy: ScoringPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn parse_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Overlays this request on `defaults` and validates the result.
    /// An empty query is valid; it simply matches nothing.
    pub fn resolve(&self, defaults: &RankingConfig) -> Result<RankingConfig, RequestValidationError> {
        if self.query.chars().count() > MAX_QUERY_CHARS {
            return Err(RequestValidationError::QueryTooLong(MAX_QUERY_CHARS));
        }

        let ranking = RankingConfig {
            similarity_threshold: self
                .similarity_threshold
                .unwrap_or(defaults.similarity_threshold),
            top_k: self.top_k.unwrap_or(defaults.top_k),
            alpha: self.alpha.unwrap_or(defaults.alpha),
            policy: self.policy.unwrap_or(defaults.policy),
        };
        ranking.validate()?;
        Ok(ranking)
    }
}
