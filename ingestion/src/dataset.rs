use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;
use triage_core::error::{ErrorCode, TriageError};
use triage_core::model::DiseaseRecord;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset file not found: {0}")]
    NotFound(String),
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("dataset must be a JSON array of records")]
    NotAnArray,
}

impl TriageError for DatasetError {
    fn error_code(&self) -> ErrorCode {
        match self {
            DatasetError::NotFound(_) => ErrorCode::NotFound,
            DatasetError::Io { .. } => ErrorCode::Unavailable,
            DatasetError::Json(_) | DatasetError::NotAnArray => ErrorCode::InvalidArgument,
        }
    }
}

/// A dataset entry that could not be turned into a [`DiseaseRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDataset {
    /// File the records came from; `None` for in-memory input or a merge of
    /// several files.
    pub source: Option<String>,
    pub records: Vec<DiseaseRecord>,
    pub rejected: Vec<RejectedRecord>,
}

impl ParsedDataset {
    pub fn extend(&mut self, other: ParsedDataset) {
        if self.records.is_empty() && self.rejected.is_empty() {
            self.source = other.source;
        } else if self.source != other.source {
            self.source = None;
        }
        self.records.extend(other.records);
        self.rejected.extend(other.rejected);
    }
}

/// Parses a JSON array of `{disease, symptoms, precautions}` objects.
///
/// Each element is decoded on its own: an element without a usable `disease`
/// is reported in [`ParsedDataset::rejected`] and the rest are kept. Only a
/// document that is not a JSON array fails as a whole.
pub fn parse_dataset(raw: &str) -> Result<ParsedDataset, DatasetError> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Array(items) = value else {
        return Err(DatasetError::NotAnArray);
    };

    let mut parsed = ParsedDataset::default();
    for (index, item) in items.into_iter().enumerate() {
        match decode_record(item) {
            Ok(record) => parsed.records.push(record),
            Err(reason) => {
                tracing::warn!("Rejected dataset record {}: {}", index, reason);
                parsed.rejected.push(RejectedRecord {
                    source: None,
                    index,
                    reason,
                });
            }
        }
    }

    Ok(parsed)
}

pub async fn load_dataset_file(path: impl AsRef<Path>) -> Result<ParsedDataset, DatasetError> {
    let path = path.as_ref();
    let source_path = path.display().to_string();

    let raw = tokio::fs::read_to_string(path).await.map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            DatasetError::NotFound(source_path.clone())
        } else {
            DatasetError::Io {
                path: source_path.clone(),
                source: err,
            }
        }
    })?;

    let mut parsed = parse_dataset(&raw)?;
    parsed.source = Some(source_path.clone());
    for rejected in &mut parsed.rejected {
        rejected.source = Some(source_path.clone());
    }

    tracing::info!(
        "Loaded dataset {}: {} records, {} rejected",
        source_path,
        parsed.records.len(),
        parsed.rejected.len()
    );
    Ok(parsed)
}

/// Loads several dataset files and concatenates their records in order.
/// Overlapping diseases are merged later by idempotent graph construction.
pub async fn load_dataset_files<P: AsRef<Path>>(paths: &[P]) -> Result<ParsedDataset, DatasetError> {
    let mut merged = ParsedDataset::default();
    for path in paths {
        merged.extend(load_dataset_file(path).await?);
    }
    Ok(merged)
}

fn decode_record(item: Value) -> Result<DiseaseRecord, String> {
    if !item.is_object() {
        return Err("record is not a JSON object".to_string());
    }
    let record: DiseaseRecord = serde_json::from_value(item).map_err(|err| err.to_string())?;

    let disease = record.disease.trim();
    if disease.is_empty() {
        return Err("disease name is empty".to_string());
    }

    Ok(DiseaseRecord {
        disease: disease.to_string(),
        symptoms: clean_values(record.symptoms),
        precautions: clean_values(record.precautions),
    })
}

fn clean_values(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}
