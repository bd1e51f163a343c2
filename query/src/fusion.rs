use crate::matcher::MatchedSymptom;
use crate::scoring::DiseaseScore;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct RankedDisease {
    pub disease: String,
    pub score: f32,
    pub graph_score: Option<f32>,
    pub vector_score: Option<f32>,
    pub matches: Vec<MatchedSymptom>,
    pub total_symptoms: usize,
}

impl RankedDisease {
    /// A baseline-scored disease carries neither component score.
    pub fn from_baseline(score: DiseaseScore) -> Self {
        Self {
            disease: score.disease,
            score: score.score,
            graph_score: None,
            vector_score: None,
            matches: score.matches,
            total_symptoms: score.total_symptoms,
        }
    }
}

pub fn fused_score(alpha: f32, graph_score: f32, vector_score: f32) -> f32 {
    alpha * graph_score + (1.0 - alpha) * vector_score
}

/// Combines graph and vector scores for every graph candidate. A candidate
/// missing from `vector_scores` counts 0 for the vector term.
pub fn fuse(
    alpha: f32,
    graph_scores: Vec<DiseaseScore>,
    vector_scores: &HashMap<String, f32>,
) -> Vec<RankedDisease> {
    graph_scores
        .into_iter()
        .map(|candidate| {
            let vector_score = vector_scores.get(&candidate.disease).copied();
            RankedDisease {
                score: fused_score(alpha, candidate.score, vector_score.unwrap_or(0.0)),
                graph_score: Some(candidate.score),
                vector_score,
                disease: candidate.disease,
                matches: candidate.matches,
                total_symptoms: candidate.total_symptoms,
            }
        })
        .collect()
}

/// Orders by score, highest first, and keeps at most `top_k`. The sort is
/// stable so equal scores keep their candidate order.
pub fn rank(mut candidates: Vec<RankedDisease>, top_k: usize) -> Vec<RankedDisease> {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates.truncate(top_k);
    candidates
}
