use crate::matcher::MatchedSymptom;
use std::collections::HashMap;
use storage::{cosine_similarity, KnowledgeBase, KnowledgeGraph};

/// Per-disease score together with the matched symptoms that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct DiseaseScore {
    pub disease: String,
    pub score: f32,
    pub matches: Vec<MatchedSymptom>,
    pub total_symptoms: usize,
}

/// Accumulates every disease linked to a matched symptom, in first-seen order.
fn collect_candidates(graph: &KnowledgeGraph, matches: &[MatchedSymptom]) -> Vec<DiseaseScore> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut candidates: Vec<DiseaseScore> = Vec::new();

    for matched in matches {
        for disease in graph.diseases_with_symptom(&matched.symptom) {
            let pos = match positions.get(disease) {
                Some(&pos) => pos,
                None => {
                    positions.insert(disease.to_string(), candidates.len());
                    candidates.push(DiseaseScore {
                        disease: disease.to_string(),
                        score: 0.0,
                        matches: Vec::new(),
                        total_symptoms: graph.symptom_count(disease),
                    });
                    candidates.len() - 1
                }
            };
            candidates[pos].matches.push(matched.clone());
        }
    }

    candidates.retain(|candidate| candidate.total_symptoms > 0);
    candidates
}

/// Sum of matched similarities divided by the disease's symptom count.
pub fn graph_scores(graph: &KnowledgeGraph, matches: &[MatchedSymptom]) -> Vec<DiseaseScore> {
    let mut candidates = collect_candidates(graph, matches);
    for candidate in &mut candidates {
        let total: f32 = candidate.matches.iter().map(|m| m.similarity).sum();
        candidate.score = total / candidate.total_symptoms as f32;
    }
    candidates
}

/// Cosine similarity between the query embedding and each candidate's
/// symptom centroid. Candidates without a centroid are left out.
pub fn vector_scores<'a>(
    knowledge_base: &KnowledgeBase,
    query_embedding: &[f32],
    candidates: impl IntoIterator<Item = &'a str>,
) -> HashMap<String, f32> {
    candidates
        .into_iter()
        .filter_map(|disease| {
            let centroid = knowledge_base.disease_centroid(disease)?;
            let score = cosine_similarity(query_embedding, &centroid)?;
            Some((disease.to_string(), score))
        })
        .collect()
}

/// Frequency-weighted heuristic: each matched symptom contributes
/// `(1/total_symptoms + 1/distinct_matches) * similarity` to every disease
/// that has it.
pub fn baseline_scores(graph: &KnowledgeGraph, matches: &[MatchedSymptom]) -> Vec<DiseaseScore> {
    let mut candidates = collect_candidates(graph, matches);
    let distinct = matches.len().max(1) as f32;
    for candidate in &mut candidates {
        let weight = 1.0 / candidate.total_symptoms as f32 + 1.0 / distinct;
        candidate.score = candidate
            .matches
            .iter()
            .map(|m| weight * m.similarity)
            .sum();
    }
    candidates
}
