use ingestion::{KnowledgeBaseBuilder, LexiconEmbedder};
use query::{DiagnosisEngine, DiagnosisError};
use std::sync::Arc;
use std::time::Duration;
use storage::KnowledgeBase;
use triage_core::embedding::{BoxFuture, EmbeddingError, EmbeddingProvider};
use triage_core::error::{ErrorCode, TriageError};
use triage_core::model::DiseaseRecord;

enum Behaviour {
    Fail,
    Slow,
    DropOne,
    WrongDims,
}

struct FaultyProvider(Behaviour);

impl EmbeddingProvider for FaultyProvider {
    fn embed_batch<'a>(
        &'a self,
        texts: &'a [String],
    ) -> BoxFuture<'a, Result<Vec<Vec<f32>>, EmbeddingError>> {
        Box::pin(async move {
            match self.0 {
                Behaviour::Fail => Err(EmbeddingError::Provider("connection refused".into())),
                Behaviour::Slow => {
                    tokio::time::sleep(Duration::from_millis(500)).await;
                    Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
                }
                Behaviour::DropOne => Ok(texts.iter().skip(1).map(|_| vec![1.0, 0.0]).collect()),
                Behaviour::WrongDims => Ok(texts.iter().map(|_| vec![1.0; 7]).collect()),
            }
        })
    }

    fn model_id(&self) -> &str {
        "faulty"
    }
}

async fn knowledge_base() -> Arc<KnowledgeBase> {
    let mut builder = KnowledgeBaseBuilder::new(Arc::new(LexiconEmbedder::new(["fever", "cough"])));
    builder.add_record(&DiseaseRecord::new("Flu", ["fever", "cough"], ["rest"]));
    let (kb, _) = builder.build().await.unwrap();
    kb
}

async fn diagnose_with(behaviour: Behaviour, query: &str) -> DiagnosisError {
    let engine = DiagnosisEngine::new(knowledge_base().await, Arc::new(FaultyProvider(behaviour)))
        .with_embedding_timeout(Duration::from_millis(20));
    engine.diagnose_text(query).await.unwrap_err()
}

#[tokio::test]
async fn test_provider_failure_is_unavailable() {
    let err = diagnose_with(Behaviour::Fail, "fever").await;
    assert_eq!(err.error_code(), ErrorCode::Unavailable);
}

#[tokio::test]
async fn test_provider_timeout_is_deadline_exceeded() {
    let err = diagnose_with(Behaviour::Slow, "fever").await;
    assert!(matches!(err, DiagnosisError::EmbeddingTimeout(_)));
    assert_eq!(err.error_code(), ErrorCode::DeadlineExceeded);
}

#[tokio::test]
async fn test_miscounted_batch_is_internal() {
    let err = diagnose_with(Behaviour::DropOne, "fever. cough").await;
    assert!(matches!(
        err,
        DiagnosisError::Embedding(EmbeddingError::CountMismatch {
            expected: 2,
            actual: 1
        })
    ));
    assert_eq!(err.error_code(), ErrorCode::Internal);
}

#[tokio::test]
async fn test_dimension_mismatch_is_internal() {
    let err = diagnose_with(Behaviour::WrongDims, "fever").await;
    assert_eq!(err.error_code(), ErrorCode::Internal);
}

#[tokio::test]
async fn test_invalid_overrides_are_invalid_argument() {
    let engine = DiagnosisEngine::new(
        knowledge_base().await,
        Arc::new(LexiconEmbedder::new(["fever", "cough"])),
    );

    for raw in [
        r#"{"query": "fever", "top_k": 0}"#,
        r#"{"query": "fever", "alpha": 1.5}"#,
        r#"{"query": "fever", "similarity_threshold": -2.0}"#,
        r#"{"query": "fever", "policy": "unknown"}"#,
        r#"{"top_k": 3}"#,
    ] {
        let err = engine.diagnose_json(raw).await.unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::InvalidArgument, "{raw}");
    }

    // Requests that fail to parse never reach the pipeline.
    let metrics = engine.metrics();
    assert_eq!(metrics.total_queries, 3);
    assert_eq!(metrics.errors, 3);
}

#[tokio::test]
async fn test_errors_counted_in_metrics() {
    let engine = DiagnosisEngine::new(
        knowledge_base().await,
        Arc::new(FaultyProvider(Behaviour::Fail)),
    );
    let _ = engine.diagnose_text("fever").await;
    let _ = engine.diagnose_text("").await;

    let metrics = engine.metrics();
    assert_eq!(metrics.total_queries, 2);
    assert_eq!(metrics.errors, 1);
    assert_eq!(metrics.no_matches, 1);
    assert!((metrics.no_match_rate - 0.5).abs() < 1e-6);
}
