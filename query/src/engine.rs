use crate::dsl::{DiagnosisRequest, RequestValidationError};
use crate::fusion::{fuse, rank, RankedDisease};
use crate::matcher::{match_symptoms, segment_query, MatchedSymptom};
use crate::planner::{QueryPlan, QueryPlanner};
use crate::result::{assemble, DiagnosisResult, DiseaseInfo};
use crate::scoring::{baseline_scores, graph_scores, vector_scores};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use storage::KnowledgeBase;
use thiserror::Error;
use triage_core::config::{AppConfig, EmbeddingConfig, RankingConfig};
use triage_core::embedding::{validate_batch, EmbeddingError, EmbeddingProvider};
use triage_core::error::{ErrorCode, TriageError};
use triage_core::metrics::{DiagnosisOutcome, MetricsCollector, MetricsSnapshot};
use triage_core::model::ScoringPolicy;

#[derive(Debug, Error)]
pub enum DiagnosisError {
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] RequestValidationError),
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),
    #[error("embedding provider timed out after {0:?}")]
    EmbeddingTimeout(Duration),
}

impl TriageError for DiagnosisError {
    fn error_code(&self) -> ErrorCode {
        match self {
            DiagnosisError::InvalidQuery(_) | DiagnosisError::InvalidRequest(_) => {
                ErrorCode::InvalidArgument
            }
            DiagnosisError::Embedding(err) => err.error_code(),
            DiagnosisError::EmbeddingTimeout(_) => ErrorCode::DeadlineExceeded,
        }
    }
}

/// Answers diagnosis queries against a shared, read-only [`KnowledgeBase`].
///
/// Every call works on its own local state, so one engine can serve any number
/// of concurrent requests.
pub struct DiagnosisEngine {
    knowledge_base: Arc<KnowledgeBase>,
    provider: Arc<dyn EmbeddingProvider>,
    ranking: RankingConfig,
    embedding_timeout: Duration,
    metrics: MetricsCollector,
}

impl DiagnosisEngine {
    pub fn new(knowledge_base: Arc<KnowledgeBase>, provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            knowledge_base,
            provider,
            ranking: RankingConfig::default(),
            embedding_timeout: Duration::from_millis(EmbeddingConfig::default().timeout_ms),
            metrics: MetricsCollector::default(),
        }
    }

    pub fn from_config(
        knowledge_base: Arc<KnowledgeBase>,
        provider: Arc<dyn EmbeddingProvider>,
        config: &AppConfig,
    ) -> Self {
        Self::new(knowledge_base, provider)
            .with_ranking(config.ranking)
            .with_embedding_timeout(Duration::from_millis(config.embedding.timeout_ms))
    }

    pub fn with_ranking(mut self, ranking: RankingConfig) -> Self {
        self.ranking = ranking;
        self
    }

    pub fn with_embedding_timeout(mut self, timeout: Duration) -> Self {
        self.embedding_timeout = timeout;
        self
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.knowledge_base
    }

    pub fn ranking(&self) -> &RankingConfig {
        &self.ranking
    }

    pub fn embedding_timeout(&self) -> Duration {
        self.embedding_timeout
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Symptoms and precautions of a disease by exact name.
    pub fn disease_info(&self, disease: &str) -> Option<DiseaseInfo> {
        DiseaseInfo::lookup(self.knowledge_base.graph(), disease)
    }

    pub async fn diagnose_text(&self, query: &str) -> Result<DiagnosisResult, DiagnosisError> {
        self.diagnose(DiagnosisRequest::new(query)).await
    }

    pub async fn diagnose_json(&self, raw: &str) -> Result<DiagnosisResult, DiagnosisError> {
        let request = DiagnosisRequest::parse_json(raw)
            .map_err(|err| DiagnosisError::InvalidQuery(err.to_string()))?;
        self.diagnose(request).await
    }

    pub async fn diagnose(
        &self,
        request: DiagnosisRequest,
    ) -> Result<DiagnosisResult, DiagnosisError> {
        let start = Instant::now();
        let result = self.diagnose_internal(request).await;
        let latency_us = start.elapsed().as_micros() as u64;

        let outcome = match &result {
            Ok(result) => {
                tracing::info!(
                    status = ?result.status,
                    best_match = result.best_match.as_ref().map(|c| c.disease.as_str()),
                    latency_us,
                    "Diagnosis finished"
                );
                if result.is_match() {
                    DiagnosisOutcome::Success
                } else {
                    DiagnosisOutcome::NoMatch
                }
            }
            Err(err) => {
                tracing::warn!(code = %err.error_code(), "Diagnosis failed: {}", err);
                DiagnosisOutcome::Error
            }
        };
        self.metrics.record_diagnosis(latency_us, outcome);
        result
    }

    async fn diagnose_internal(
        &self,
        request: DiagnosisRequest,
    ) -> Result<DiagnosisResult, DiagnosisError> {
        let ranking = request.resolve(&self.ranking)?;
        let plan = QueryPlanner::plan(&ranking);
        tracing::debug!(query = %request.query, steps = ?plan.steps, "Planning diagnosis");

        if request.query.trim().is_empty() {
            return Ok(DiagnosisResult::no_match(request.query, plan.policy));
        }

        let segments = segment_query(&request.query);
        let segment_embeddings = self.embed(&segments).await?;
        let matches = match_symptoms(
            &segment_embeddings,
            self.knowledge_base.symptom_index(),
            plan.similarity_threshold,
        );

        if matches.is_empty() {
            tracing::debug!(segments = segments.len(), "No symptoms matched");
            return Ok(DiagnosisResult::no_match(request.query, plan.policy));
        }

        let ranked = self.score(&request.query, &plan, &matches).await?;
        let ranked = rank(ranked, plan.top_k);

        tracing::debug!(
            segments = segments.len(),
            matched = matches.len(),
            candidates = ranked.len(),
            policy = %plan.policy,
            "Ranked candidates"
        );

        Ok(assemble(
            &request.query,
            plan.policy,
            &matches,
            ranked,
            self.knowledge_base.graph(),
        ))
    }

    async fn score(
        &self,
        query: &str,
        plan: &QueryPlan,
        matches: &[MatchedSymptom],
    ) -> Result<Vec<RankedDisease>, DiagnosisError> {
        let graph = self.knowledge_base.graph();

        if plan.policy == ScoringPolicy::Baseline {
            return Ok(baseline_scores(graph, matches)
                .into_iter()
                .map(RankedDisease::from_baseline)
                .collect());
        }

        let graph_candidates = graph_scores(graph, matches);
        let vector = if plan.embed_query && !graph_candidates.is_empty() {
            let query_embedding = self
                .embed(&[query.to_string()])
                .await?
                .into_iter()
                .next()
                .unwrap_or_default();
            vector_scores(
                &self.knowledge_base,
                &query_embedding,
                graph_candidates.iter().map(|c| c.disease.as_str()),
            )
        } else {
            HashMap::new()
        };

        Ok(fuse(plan.alpha, graph_candidates, &vector))
    }

    /// One bounded provider call, checked for count and dimension against the
    /// symptom index.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DiagnosisError> {
        let embeddings = tokio::time::timeout(self.embedding_timeout, self.provider.embed_batch(texts))
            .await
            .map_err(|_| DiagnosisError::EmbeddingTimeout(self.embedding_timeout))??;

        validate_batch(texts.len(), &embeddings)?;
        if let (Some(expected), Some(first)) = (
            self.knowledge_base.symptom_index().dimensions(),
            embeddings.first(),
        ) {
            if first.len() != expected {
                return Err(EmbeddingError::DimensionMismatch {
                    expected,
                    actual: first.len(),
                }
                .into());
            }
        }
        Ok(embeddings)
    }
}
