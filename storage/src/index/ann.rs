use std::collections::HashMap;

/// Linear-scan cosine index keyed by text. Iteration and result order follow
/// insertion order, so equal scores come back deterministically.
#[derive(Debug, Clone, Default)]
pub struct LinearAnnIndex {
    keys: Vec<String>,
    embeddings: Vec<Vec<f32>>,
    positions: HashMap<String, usize>,
}

impl LinearAnnIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the vector stored under `key`.
    pub fn insert(&mut self, key: impl Into<String>, embedding: Vec<f32>) {
        let key = key.into();
        match self.positions.get(&key) {
            Some(pos) => self.embeddings[*pos] = embedding,
            None => {
                self.positions.insert(key.clone(), self.keys.len());
                self.keys.push(key);
                self.embeddings.push(embedding);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&[f32]> {
        self.positions
            .get(key)
            .map(|pos| self.embeddings[*pos].as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f32])> {
        self.keys
            .iter()
            .zip(self.embeddings.iter())
            .map(|(key, emb)| (key.as_str(), emb.as_slice()))
    }

    /// Every entry whose similarity to `query` is at least `threshold`
    /// (inclusive), in insertion order.
    pub fn scan(&self, query: &[f32], threshold: f32) -> Vec<(&str, f32)> {
        self.iter()
            .filter_map(|(key, emb)| cosine_similarity(query, emb).map(|score| (key, score)))
            .filter(|(_, score)| *score >= threshold)
            .collect()
    }

    pub fn dimensions(&self) -> Option<usize> {
        self.embeddings.first().map(Vec::len)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// `None` when the vectors cannot be compared (different or zero length).
/// A zero vector has similarity 0 with everything.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Some(0.0);
    }

    Some(dot / (norm_a * norm_b))
}
