use serde::{Deserialize, Serialize};

/// One entry of the disease dataset:
/// `{ "disease": ..., "symptoms": [...], "precautions": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseRecord {
    pub disease: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub precautions: Vec<String>,
}

impl DiseaseRecord {
    pub fn new(
        disease: impl Into<String>,
        symptoms: impl IntoIterator<Item = impl Into<String>>,
        precautions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            disease: disease.into(),
            symptoms: symptoms.into_iter().map(Into::into).collect(),
            precautions: precautions.into_iter().map(Into::into).collect(),
        }
    }
}

/// Edge type of the knowledge graph. Every edge has a disease on one end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    HasSymptom,
    HasPrecaution,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::HasSymptom => "has_symptom",
            Relation::HasPrecaution => "has_precaution",
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How disease candidates are scored once symptoms have been matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPolicy {
    /// `alpha * graph + (1 - alpha) * vector`.
    #[default]
    Hybrid,
    /// Graph scorer only; the whole-query embedding is never requested.
    Graph,
    /// Centroid similarity only, over the diseases the graph scorer surfaced.
    Vector,
    /// `((1 / total_symptoms) + (1 / distinct_matches)) * similarity`, summed per disease.
    Baseline,
}

impl ScoringPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringPolicy::Hybrid => "hybrid",
            ScoringPolicy::Graph => "graph",
            ScoringPolicy::Vector => "vector",
            ScoringPolicy::Baseline => "baseline",
        }
    }
}

impl std::fmt::Display for ScoringPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
