use crate::error::{ErrorCode, TriageError};
use sha2::{Digest, Sha256};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmbeddingError {
    #[error("embedding provider failed: {0}")]
    Provider(String),
    #[error("embedding provider returned {actual} vectors for {expected} inputs")]
    CountMismatch { expected: usize, actual: usize },
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl TriageError for EmbeddingError {
    fn error_code(&self) -> ErrorCode {
        match self {
            EmbeddingError::Provider(_) => ErrorCode::Unavailable,
            EmbeddingError::CountMismatch { .. } | EmbeddingError::DimensionMismatch { .. } => {
                ErrorCode::Internal
            }
        }
    }
}

/// Maps an ordered batch of texts to same-length, fixed-dimension vectors.
///
/// Implementations must return the same vector for the same text. Batching is
/// only an optimization; callers may send one text per call.
pub trait EmbeddingProvider: Send + Sync {
    fn embed_batch<'a>(
        &'a self,
        texts: &'a [String],
    ) -> BoxFuture<'a, Result<Vec<Vec<f32>>, EmbeddingError>>;

    fn model_id(&self) -> &str;
}

/// Checks the shape of a provider response: one vector per input, all of the
/// same dimension.
pub fn validate_batch(expected: usize, vectors: &[Vec<f32>]) -> Result<(), EmbeddingError> {
    if vectors.len() != expected {
        return Err(EmbeddingError::CountMismatch {
            expected,
            actual: vectors.len(),
        });
    }
    if let Some(first) = vectors.first() {
        let dims = first.len();
        if let Some(bad) = vectors.iter().find(|v| v.len() != dims) {
            return Err(EmbeddingError::DimensionMismatch {
                expected: dims,
                actual: bad.len(),
            });
        }
    }
    Ok(())
}

pub fn deterministic_embedding(text: &str, model_id: &str, dims: usize) -> Vec<f32> {
    let dims = dims.max(1);

    let mut hasher = Sha256::new();
    hasher.update(model_id.as_bytes());
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();

    let mut out = Vec::with_capacity(dims);
    for i in 0..dims {
        let byte = digest[i % digest.len()];
        let value = (byte as f32 / 127.5) - 1.0;
        out.push(value);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_embedding_is_reproducible_for_same_inputs() {
        let a = deterministic_embedding("fever", "embedding-default-v1", 8);
        let b = deterministic_embedding("fever", "embedding-default-v1", 8);
        assert_eq!(a, b);
    }

    #[test]
    fn deterministic_embedding_changes_when_model_changes() {
        let a = deterministic_embedding("fever", "embedding-default-v1", 8);
        let b = deterministic_embedding("fever", "embedding-alt-v1", 8);
        assert_ne!(a, b);
    }

    #[test]
    fn validate_batch_rejects_wrong_count_and_ragged_dims() {
        assert!(validate_batch(2, &[vec![1.0], vec![0.0]]).is_ok());
        assert_eq!(
            validate_batch(2, &[vec![1.0]]),
            Err(EmbeddingError::CountMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            validate_batch(2, &[vec![1.0, 0.0], vec![1.0]]),
            Err(EmbeddingError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            EmbeddingError::Provider("down".into()).error_code(),
            ErrorCode::Unavailable
        );
    }
}
