use triage_core::embedding::{deterministic_embedding, BoxFuture, EmbeddingError, EmbeddingProvider};

/// Hash-seeded vectors: reproducible but with no semantic structure. Suited
/// to load tests and benchmarks where only shapes and timings matter.
pub struct DeterministicEmbedder {
    dims: usize,
    model_id: String,
}

impl DeterministicEmbedder {
    pub fn new(dims: usize) -> Self {
        Self::with_model(dims, "embedding-default-v1")
    }

    pub fn with_model(dims: usize, model_id: impl Into<String>) -> Self {
        Self {
            dims: dims.max(1),
            model_id: model_id.into(),
        }
    }
}

impl Default for DeterministicEmbedder {
    fn default() -> Self {
        Self::new(384)
    }
}

impl EmbeddingProvider for DeterministicEmbedder {
    fn embed_batch<'a>(
        &'a self,
        texts: &'a [String],
    ) -> BoxFuture<'a, Result<Vec<Vec<f32>>, EmbeddingError>> {
        Box::pin(async move {
            Ok(texts
                .iter()
                .map(|text| deterministic_embedding(text, &self.model_id, self.dims))
                .collect())
        })
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Keyword-stem embedder: one dimension per stem, set to 1.0 when the
/// lower-cased text contains that stem.
///
/// "feverish" and "fever" share the `fever` dimension, so texts that mention
/// the same concepts land close together. This gives tests and offline runs a
/// small, fully predictable stand-in for a sentence-embedding model.
pub struct LexiconEmbedder {
    stems: Vec<String>,
    model_id: String,
}

impl LexiconEmbedder {
    pub fn new(stems: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            stems: stems
                .into_iter()
                .map(|stem| stem.into().to_lowercase())
                .collect(),
            model_id: "lexicon-v1".to_string(),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.stems.len()
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let lowered = text.to_lowercase();
        self.stems
            .iter()
            .map(|stem| if lowered.contains(stem.as_str()) { 1.0 } else { 0.0 })
            .collect()
    }
}

impl EmbeddingProvider for LexiconEmbedder {
    fn embed_batch<'a>(
        &'a self,
        texts: &'a [String],
    ) -> BoxFuture<'a, Result<Vec<Vec<f32>>, EmbeddingError>> {
        Box::pin(async move { Ok(texts.iter().map(|text| self.embed_text(text)).collect()) })
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
