pub mod dataset;
pub mod embedding;
pub mod processor;

pub use dataset::{load_dataset_file, load_dataset_files, parse_dataset, DatasetError, ParsedDataset, RejectedRecord};
pub use embedding::{DeterministicEmbedder, LexiconEmbedder};
pub use processor::{BuildError, BuildReport, KnowledgeBaseBuilder};
