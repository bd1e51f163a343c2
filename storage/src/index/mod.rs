pub mod ann;
pub mod graph;

pub use ann::{cosine_similarity, LinearAnnIndex};
pub use graph::{DiseaseEntry, GraphEdge, GraphError, GraphStats, KnowledgeGraph};
