use triage_core::config::RankingConfig;
use triage_core::model::ScoringPolicy;

#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub policy: ScoringPolicy,
    pub alpha: f32,
    pub top_k: usize,
    pub similarity_threshold: f32,
    /// Whether the whole query is embedded for disease-level vector scoring.
    pub embed_query: bool,
    pub steps: Vec<&'static str>,
}

pub struct QueryPlanner;

impl QueryPlanner {
    pub fn plan(ranking: &RankingConfig) -> QueryPlan {
        let (alpha, embed_query, steps) = match ranking.policy {
            ScoringPolicy::Hybrid => (
                ranking.alpha,
                true,
                vec![
                    "segment_query",
                    "match_symptoms",
                    "graph_score",
                    "vector_score",
                    "fuse",
                    "assemble",
                ],
            ),
            ScoringPolicy::Graph => (
                1.0,
                false,
                vec![
                    "segment_query",
                    "match_symptoms",
                    "graph_score",
                    "fuse",
                    "assemble",
                ],
            ),
            ScoringPolicy::Vector => (
                0.0,
                true,
                vec![
                    "segment_query",
                    "match_symptoms",
                    "graph_score",
                    "vector_score",
                    "fuse",
                    "assemble",
                ],
            ),
            ScoringPolicy::Baseline => (
                ranking.alpha,
                false,
                vec!["segment_query", "match_symptoms", "baseline_score", "assemble"],
            ),
        };

        QueryPlan {
            policy: ranking.policy,
            alpha,
            top_k: ranking.top_k,
            similarity_threshold: ranking.similarity_threshold,
            embed_query,
            steps,
        }
    }
}
