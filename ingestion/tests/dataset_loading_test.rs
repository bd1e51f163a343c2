use ingestion::{
    load_dataset_file, load_dataset_files, BuildError, DatasetError, DeterministicEmbedder,
    KnowledgeBaseBuilder,
};
use std::sync::Arc;
use tempfile::tempdir;
use triage_core::config::DatasetConfig;
use triage_core::error::{ErrorCode, TriageError};

const PRIMARY: &str = r#"[
    {"disease": "Flu", "symptoms": ["fever", "cough"], "precautions": ["rest"]},
    {"disease": "", "symptoms": ["rash"]}
]"#;

const SECONDARY: &str = r#"[
    {"disease": "Flu", "symptoms": ["cough", "body ache"], "precautions": ["rest", "drink fluids"]},
    {"disease": "Measles", "symptoms": ["rash", "fever"]}
]"#;

#[tokio::test]
async fn test_load_single_file_tags_rejections_with_source() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("primary.json");
    std::fs::write(&path, PRIMARY).unwrap();

    let parsed = load_dataset_file(&path).await.unwrap();
    assert_eq!(parsed.records.len(), 1);
    assert_eq!(parsed.rejected.len(), 1);
    let expected = path.display().to_string();
    assert_eq!(parsed.source.as_deref(), Some(expected.as_str()));
    assert_eq!(parsed.rejected[0].source.as_deref(), Some(expected.as_str()));
}

#[tokio::test]
async fn test_load_with_subscriber_installed() {
    triage_core::init_tracing();

    let dir = tempdir().unwrap();
    let path = dir.path().join("primary.json");
    std::fs::write(&path, PRIMARY).unwrap();

    let parsed = load_dataset_file(&path).await.unwrap();
    assert_eq!(parsed.records[0].disease, "Flu");
}

#[tokio::test]
async fn test_multiple_files_merge_into_one_graph() {
    let dir = tempdir().unwrap();
    let primary = dir.path().join("primary.json");
    let secondary = dir.path().join("secondary.json");
    std::fs::write(&primary, PRIMARY).unwrap();
    std::fs::write(&secondary, SECONDARY).unwrap();

    let merged = load_dataset_files(&[&primary, &secondary]).await.unwrap();
    assert_eq!(merged.records.len(), 3);
    assert_eq!(merged.source, None);

    let config = DatasetConfig {
        paths: vec![
            primary.display().to_string(),
            secondary.display().to_string(),
        ],
    };
    let mut builder = KnowledgeBaseBuilder::new(Arc::new(DeterministicEmbedder::new(8)));
    builder.add_config(&config).await.unwrap();
    let (kb, report) = builder.build().await.unwrap();

    assert_eq!(report.accepted_records, 3);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.stats.diseases, 2);

    let flu = kb.graph().disease("Flu").unwrap();
    assert_eq!(flu.symptoms, vec!["fever", "cough", "body ache"]);
    assert_eq!(flu.precautions, vec!["rest", "drink fluids"]);
    assert!(kb.graph().precautions_of("Measles").is_empty());
    assert_eq!(kb.symptom_index().len(), 4);
    assert_eq!(kb.symptom_index().dimensions(), Some(8));
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.json");

    let err = load_dataset_file(&missing).await.unwrap_err();
    assert!(matches!(err, DatasetError::NotFound(_)));
    assert_eq!(err.error_code(), ErrorCode::NotFound);

    let mut builder = KnowledgeBaseBuilder::new(Arc::new(DeterministicEmbedder::default()));
    let err = builder.add_file(&missing).await.err().unwrap();
    assert!(matches!(err, BuildError::Dataset(DatasetError::NotFound(_))));
}

#[tokio::test]
async fn test_malformed_file_is_invalid_argument() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{\"disease\": ").unwrap();

    let err = load_dataset_file(&path).await.unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::InvalidArgument);
}
