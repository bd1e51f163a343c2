use crate::index::KnowledgeGraph;
use crate::symptom_index::SymptomIndex;
use triage_core::embedding::{EmbeddingError, EmbeddingProvider};

/// KnowledgeBase bundles the knowledge graph with the symptom embedding index.
///
/// Both halves are immutable once built, so a single instance can be shared
/// (behind an `Arc`) by any number of concurrent queries without locking.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    graph: KnowledgeGraph,
    symptom_index: SymptomIndex,
}

impl KnowledgeBase {
    /// Embeds every symptom node of `graph` and freezes both.
    pub async fn build(
        graph: KnowledgeGraph,
        provider: &dyn EmbeddingProvider,
    ) -> Result<Self, EmbeddingError> {
        let symptom_index = SymptomIndex::build(&graph, provider).await?;
        Ok(Self {
            graph,
            symptom_index,
        })
    }

    pub fn from_parts(graph: KnowledgeGraph, symptom_index: SymptomIndex) -> Self {
        Self {
            graph,
            symptom_index,
        }
    }

    pub fn graph(&self) -> &KnowledgeGraph {
        &self.graph
    }

    pub fn symptom_index(&self) -> &SymptomIndex {
        &self.symptom_index
    }

    /// Mean embedding of all symptoms linked to `disease`.
    pub fn disease_centroid(&self, disease: &str) -> Option<Vec<f32>> {
        self.symptom_index.centroid(
            self.graph
                .symptoms_of(disease)
                .iter()
                .map(String::as_str),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::model::DiseaseRecord;

    #[test]
    fn test_disease_centroid() {
        let (graph, _) = KnowledgeGraph::from_records(&[DiseaseRecord::new(
            "Cold",
            ["cough", "sneezing"],
            ["rest"],
        )]);
        let index = SymptomIndex::from_embeddings(
            "test",
            vec![
                ("cough".to_string(), vec![0.0, 1.0, 0.0]),
                ("sneezing".to_string(), vec![0.0, 0.0, 1.0]),
            ],
        );
        let kb = KnowledgeBase::from_parts(graph, index);

        assert_eq!(kb.disease_centroid("Cold"), Some(vec![0.0, 0.5, 0.5]));
        assert_eq!(kb.disease_centroid("Flu"), None);
    }
}
