use crate::index::{KnowledgeGraph, LinearAnnIndex};
use triage_core::embedding::{validate_batch, EmbeddingError, EmbeddingProvider};

/// Precomputed embedding for every symptom node of a [`KnowledgeGraph`].
///
/// Built once at startup with a single batched provider call and read-only
/// afterwards; queries never re-embed knowledge-base symptoms.
#[derive(Debug, Clone, Default)]
pub struct SymptomIndex {
    vectors: LinearAnnIndex,
    model_id: String,
}

impl SymptomIndex {
    pub async fn build(
        graph: &KnowledgeGraph,
        provider: &dyn EmbeddingProvider,
    ) -> Result<Self, EmbeddingError> {
        let symptoms = graph.symptoms();
        let mut vectors = LinearAnnIndex::new();

        if !symptoms.is_empty() {
            let embeddings = provider.embed_batch(symptoms).await?;
            validate_batch(symptoms.len(), &embeddings)?;
            for (symptom, embedding) in symptoms.iter().zip(embeddings) {
                vectors.insert(symptom.clone(), embedding);
            }
        }

        tracing::info!(
            "Symptom index built: {} symptoms, {} dims, model {}",
            vectors.len(),
            vectors.dimensions().unwrap_or(0),
            provider.model_id()
        );

        Ok(Self {
            vectors,
            model_id: provider.model_id().to_string(),
        })
    }

    /// Assembles an index from vectors computed elsewhere.
    pub fn from_embeddings(
        model_id: impl Into<String>,
        embeddings: impl IntoIterator<Item = (String, Vec<f32>)>,
    ) -> Self {
        let mut vectors = LinearAnnIndex::new();
        for (symptom, embedding) in embeddings {
            vectors.insert(symptom, embedding);
        }
        Self {
            vectors,
            model_id: model_id.into(),
        }
    }

    pub fn get(&self, symptom: &str) -> Option<&[f32]> {
        self.vectors.get(symptom)
    }

    /// Symptoms whose similarity to `query` is at least `threshold`.
    pub fn scan(&self, query: &[f32], threshold: f32) -> Vec<(&str, f32)> {
        self.vectors.scan(query, threshold)
    }

    /// Arithmetic mean of the embeddings of `symptoms` that are indexed.
    /// `None` when none of them has an embedding.
    pub fn centroid<'a>(&self, symptoms: impl IntoIterator<Item = &'a str>) -> Option<Vec<f32>> {
        let embeddings: Vec<&[f32]> = symptoms.into_iter().filter_map(|s| self.get(s)).collect();
        let dims = embeddings.first()?.len();

        let mut acc = vec![0.0f32; dims];
        let mut count = 0usize;
        for embedding in embeddings.iter().filter(|e| e.len() == dims) {
            for (a, x) in acc.iter_mut().zip(embedding.iter()) {
                *a += x;
            }
            count += 1;
        }

        let n = count as f32;
        acc.iter_mut().for_each(|a| *a /= n);
        Some(acc)
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn dimensions(&self) -> Option<usize> {
        self.vectors.dimensions()
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}
