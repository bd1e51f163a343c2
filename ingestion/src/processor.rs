use crate::dataset::{load_dataset_file, DatasetError, ParsedDataset, RejectedRecord};
use std::path::Path;
use std::sync::Arc;
use storage::{GraphStats, KnowledgeBase, KnowledgeGraph};
use thiserror::Error;
use triage_core::config::DatasetConfig;
use triage_core::embedding::{EmbeddingError, EmbeddingProvider};
use triage_core::error::{ErrorCode, TriageError};
use triage_core::model::DiseaseRecord;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),
}

impl TriageError for BuildError {
    fn error_code(&self) -> ErrorCode {
        match self {
            BuildError::Dataset(err) => err.error_code(),
            BuildError::Embedding(err) => err.error_code(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub accepted_records: usize,
    pub rejected: Vec<RejectedRecord>,
    pub stats: GraphStats,
}

/// Collects dataset records into a [`KnowledgeGraph`] and, on `build`, embeds
/// its symptoms into a frozen [`KnowledgeBase`].
///
/// Records may come from several files; re-adding a disease that is already
/// present only contributes the nodes and edges it does not have yet.
pub struct KnowledgeBaseBuilder {
    provider: Arc<dyn EmbeddingProvider>,
    graph: KnowledgeGraph,
    accepted_records: usize,
    /// Records handed to `add_record` directly; numbers their rejections.
    direct_records: usize,
    rejected: Vec<RejectedRecord>,
}

impl KnowledgeBaseBuilder {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            provider,
            graph: KnowledgeGraph::new(),
            accepted_records: 0,
            direct_records: 0,
            rejected: Vec::new(),
        }
    }

    /// Adds one record. A rejection is reported with the record's position
    /// among the records passed to this method.
    pub fn add_record(&mut self, record: &DiseaseRecord) -> bool {
        let index = self.direct_records;
        self.direct_records += 1;
        self.insert(record, None, index)
    }

    /// Adds parsed records. Parse-time rejections keep the index and source
    /// assigned by the parser; graph rejections are numbered by position in
    /// `dataset.records` and tagged with `dataset.source`.
    pub fn add_dataset(&mut self, dataset: ParsedDataset) -> &mut Self {
        self.rejected.extend(dataset.rejected);
        for (index, record) in dataset.records.iter().enumerate() {
            self.insert(record, dataset.source.clone(), index);
        }
        self
    }

    fn insert(&mut self, record: &DiseaseRecord, source: Option<String>, index: usize) -> bool {
        match self.graph.add_record(record) {
            Ok(changed) => {
                self.accepted_records += 1;
                changed
            }
            Err(err) => {
                tracing::warn!("Rejected record {} ({}): {}", index, record.disease, err);
                self.rejected.push(RejectedRecord {
                    source,
                    index,
                    reason: err.to_string(),
                });
                false
            }
        }
    }

    pub async fn add_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, BuildError> {
        let dataset = load_dataset_file(path).await?;
        Ok(self.add_dataset(dataset))
    }

    pub async fn add_config(&mut self, config: &DatasetConfig) -> Result<&mut Self, BuildError> {
        for path in &config.paths {
            self.add_file(path).await?;
        }
        Ok(self)
    }

    pub fn graph(&self) -> &KnowledgeGraph {
        &self.graph
    }

    pub async fn build(self) -> Result<(Arc<KnowledgeBase>, BuildReport), BuildError> {
        let stats = self.graph.stats();
        tracing::info!(
            "Knowledge graph built: {} diseases, {} symptoms, {} precautions, {} edges ({} records rejected)",
            stats.diseases,
            stats.symptoms,
            stats.precautions,
            stats.edges,
            self.rejected.len()
        );

        let knowledge_base = KnowledgeBase::build(self.graph, self.provider.as_ref()).await?;
        let report = BuildReport {
            accepted_records: self.accepted_records,
            rejected: self.rejected,
            stats,
        };

        Ok((Arc::new(knowledge_base), report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::parse_dataset;
    use crate::embedding::LexiconEmbedder;

    #[tokio::test]
    async fn test_builder_reports_rejections_and_stats() {
        let dataset = parse_dataset(
            r#"[
                {"disease": "Flu", "symptoms": ["fever", "cough"], "precautions": ["rest"]},
                {"symptoms": ["rash"]},
                {"disease": "Cold", "symptoms": ["cough", "sneezing"], "precautions": ["rest"]}
            ]"#,
        )
        .unwrap();

        let mut builder = KnowledgeBaseBuilder::new(Arc::new(LexiconEmbedder::new([
            "fever", "cough", "sneez",
        ])));
        builder.add_dataset(dataset);
        let (kb, report) = builder.build().await.unwrap();

        assert_eq!(report.accepted_records, 2);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.stats.diseases, 2);
        assert_eq!(report.stats.symptoms, 3);
        assert_eq!(kb.symptom_index().len(), 3);
    }

    #[test]
    fn test_direct_rejections_numbered_independently_of_datasets() {
        let mut builder = KnowledgeBaseBuilder::new(Arc::new(LexiconEmbedder::new(["x"])));
        builder.add_record(&DiseaseRecord::new("A", ["x"], ["y"]));
        builder.add_dataset(
            parse_dataset(r#"[{"symptoms": ["x"]}, {"disease": "B"}, {"disease": ""}]"#).unwrap(),
        );
        builder.add_record(&DiseaseRecord::new(" ", ["x"], ["y"]));

        let indices: Vec<(Option<&str>, usize)> = builder
            .rejected
            .iter()
            .map(|r| (r.source.as_deref(), r.index))
            .collect();
        // Parse rejections keep their array positions; the blank direct
        // record is the second one passed to `add_record`.
        assert_eq!(indices, vec![(None, 0), (None, 2), (None, 1)]);
        assert_eq!(builder.accepted_records, 2);
    }

    #[tokio::test]
    async fn test_builder_rejects_blank_disease_record() {
        let mut builder = KnowledgeBaseBuilder::new(Arc::new(LexiconEmbedder::new(["x"])));
        assert!(!builder.add_record(&DiseaseRecord::new("", ["x"], ["y"])));
        assert!(builder.add_record(&DiseaseRecord::new("X", ["x"], ["y"])));
        assert!(!builder.add_record(&DiseaseRecord::new("X", ["x"], ["y"])));
        assert_eq!(builder.graph().stats().diseases, 1);
    }
}
