pub mod index;
pub mod knowledge_base;
pub mod symptom_index;

pub use index::{cosine_similarity, GraphEdge, GraphError, GraphStats, KnowledgeGraph, LinearAnnIndex};
pub use knowledge_base::KnowledgeBase;
pub use symptom_index::SymptomIndex;
