use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;
use storage::SymptomIndex;

static SENTENCE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("Invalid sentence boundary regex"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedSymptom {
    pub symptom: String,
    pub similarity: f32,
}

/// Splits free text on runs of `.`, `!` and `?`, trimming each piece and
/// dropping empty ones. A query with no non-empty piece is returned whole.
pub fn segment_query(query: &str) -> Vec<String> {
    let segments: Vec<String> = SENTENCE_BOUNDARY
        .split(query)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();

    if segments.is_empty() {
        vec![query.to_string()]
    } else {
        segments
    }
}

/// Compares every segment embedding with every indexed symptom.
///
/// A symptom matched by several segments keeps its highest similarity. The
/// result is sorted by similarity, highest first; equal similarities keep the
/// order in which the symptoms were first matched.
pub fn match_symptoms(
    segment_embeddings: &[Vec<f32>],
    index: &SymptomIndex,
    threshold: f32,
) -> Vec<MatchedSymptom> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut matches: Vec<MatchedSymptom> = Vec::new();

    for embedding in segment_embeddings {
        for (symptom, similarity) in index.scan(embedding, threshold) {
            match positions.get(symptom) {
                Some(&pos) => {
                    if similarity > matches[pos].similarity {
                        matches[pos].similarity = similarity;
                    }
                }
                None => {
                    positions.insert(symptom, matches.len());
                    matches.push(MatchedSymptom {
                        symptom: symptom.to_string(),
                        similarity,
                    });
                }
            }
        }
    }

    matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> SymptomIndex {
        SymptomIndex::from_embeddings(
            "test",
            vec![
                ("fever".to_string(), vec![1.0, 0.0]),
                ("cough".to_string(), vec![0.0, 1.0]),
            ],
        )
    }

    #[test]
    fn test_segmentation() {
        assert_eq!(
            segment_query("I have a fever!! And a cough?  ok."),
            vec!["I have a fever", "And a cough", "ok"]
        );
        assert_eq!(segment_query("no punctuation"), vec!["no punctuation"]);
        assert_eq!(segment_query("...!?"), vec!["...!?"]);
    }

    #[test]
    fn test_symptom_matched_twice_keeps_max() {
        let segments = vec![vec![1.0, 1.0], vec![1.0, 0.1], vec![0.0, 1.0]];
        let matches = match_symptoms(&segments, &index(), 0.5);

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].symptom, "cough");
        assert!((matches[0].similarity - 1.0).abs() < 1e-6);
        assert_eq!(matches[1].symptom, "fever");
        assert!(matches[1].similarity > 0.99);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let matches = match_symptoms(&[vec![1.0, 0.0]], &index(), 1.0);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].symptom, "fever");

        let none = match_symptoms(&[vec![-1.0, -1.0]], &index(), 0.0);
        assert!(none.is_empty());
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let matches = match_symptoms(&[vec![1.0, 1.0]], &index(), 0.5);
        let names: Vec<&str> = matches.iter().map(|m| m.symptom.as_str()).collect();
        assert_eq!(names, vec!["fever", "cough"]);
    }
}
