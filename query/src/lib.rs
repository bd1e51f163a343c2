pub mod dsl;
pub mod engine;
pub mod fusion;
pub mod matcher;
pub mod planner;
pub mod result;
pub mod scoring;

pub use dsl::{DiagnosisRequest, RequestValidationError};
pub use engine::{DiagnosisEngine, DiagnosisError};
pub use matcher::MatchedSymptom;
pub use planner::{QueryPlan, QueryPlanner};
pub use result::{DiagnosisResult, DiagnosisStatus, DiseaseCandidate, DiseaseInfo};
