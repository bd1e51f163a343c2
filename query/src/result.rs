use crate::fusion::RankedDisease;
use crate::matcher::MatchedSymptom;
use serde::{Deserialize, Serialize};
use storage::KnowledgeGraph;
use triage_core::model::ScoringPolicy;

pub const NO_MATCH_MESSAGE: &str =
    "Could not identify any symptoms from the query. Please describe your symptoms more clearly.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosisStatus {
    Success,
    NoMatch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseCandidate {
    pub disease: String,
    pub score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_score: Option<f32>,
    /// Matched symptoms of this disease, parallel to `similarities`.
    pub matched_symptoms: Vec<String>,
    pub similarities: Vec<f32>,
    pub num_matches: usize,
    pub total_symptoms: usize,
    pub all_symptoms: Vec<String>,
    pub precautions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub status: DiagnosisStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub query: String,
    pub policy: ScoringPolicy,
    pub matched_symptoms: Vec<String>,
    pub top_diseases: Vec<DiseaseCandidate>,
    pub best_match: Option<DiseaseCandidate>,
}

impl DiagnosisResult {
    pub fn no_match(query: impl Into<String>, policy: ScoringPolicy) -> Self {
        Self {
            status: DiagnosisStatus::NoMatch,
            message: Some(NO_MATCH_MESSAGE.to_string()),
            query: query.into(),
            policy,
            matched_symptoms: Vec::new(),
            top_diseases: Vec::new(),
            best_match: None,
        }
    }

    pub fn is_match(&self) -> bool {
        self.status == DiagnosisStatus::Success
    }
}

/// Direct lookup view of one disease.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseInfo {
    pub disease: String,
    pub symptoms: Vec<String>,
    pub precautions: Vec<String>,
}

impl DiseaseInfo {
    pub fn lookup(graph: &KnowledgeGraph, disease: &str) -> Option<Self> {
        graph.disease(disease).map(|entry| Self {
            disease: entry.name.clone(),
            symptoms: entry.symptoms.clone(),
            precautions: entry.precautions.clone(),
        })
    }
}

pub fn assemble(
    query: &str,
    policy: ScoringPolicy,
    matches: &[MatchedSymptom],
    ranked: Vec<RankedDisease>,
    graph: &KnowledgeGraph,
) -> DiagnosisResult {
    let top_diseases: Vec<DiseaseCandidate> = ranked
        .into_iter()
        .map(|ranked| DiseaseCandidate {
            matched_symptoms: ranked.matches.iter().map(|m| m.symptom.clone()).collect(),
            similarities: ranked.matches.iter().map(|m| m.similarity).collect(),
            num_matches: ranked.matches.len(),
            total_symptoms: ranked.total_symptoms,
            all_symptoms: graph.symptoms_of(&ranked.disease).to_vec(),
            precautions: graph.precautions_of(&ranked.disease).to_vec(),
            disease: ranked.disease,
            score: ranked.score,
            graph_score: ranked.graph_score,
            vector_score: ranked.vector_score,
        })
        .collect();

    DiagnosisResult {
        status: DiagnosisStatus::Success,
        message: None,
        query: query.to_string(),
        policy,
        matched_symptoms: matches.iter().map(|m| m.symptom.clone()).collect(),
        best_match: top_diseases.first().cloned(),
        top_diseases,
    }
}
