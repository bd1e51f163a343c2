use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosisOutcome {
    Success,
    NoMatch,
    Error,
}

#[derive(Debug, Clone, Default)]
pub struct DiagnosisMetrics {
    pub total_queries: u64,
    pub no_matches: u64,
    pub errors: u64,
    pub latencies: VecDeque<u64>, // microseconds
}

#[derive(Clone)]
pub struct MetricsCollector {
    state: Arc<Mutex<MetricsState>>,
}

struct MetricsState {
    diagnosis: DiagnosisMetrics,
    max_history: usize,
}

impl MetricsCollector {
    pub fn new(max_history: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(MetricsState {
                diagnosis: DiagnosisMetrics::default(),
                max_history: max_history.max(1),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MetricsState> {
        // Counters stay meaningful even if a recording thread panicked.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record_diagnosis(&self, latency_us: u64, outcome: DiagnosisOutcome) {
        let mut state = self.lock();
        let max_history = state.max_history;
        let metrics = &mut state.diagnosis;
        metrics.total_queries += 1;
        match outcome {
            DiagnosisOutcome::Success => {}
            DiagnosisOutcome::NoMatch => metrics.no_matches += 1,
            DiagnosisOutcome::Error => metrics.errors += 1,
        }
        metrics.latencies.push_back(latency_us);
        if metrics.latencies.len() > max_history {
            metrics.latencies.pop_front();
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let state = self.lock();
        let d = &state.diagnosis;

        let mut sorted_latencies: Vec<u64> = d.latencies.iter().copied().collect();
        sorted_latencies.sort_unstable();

        let no_match_rate = if d.total_queries > 0 {
            d.no_matches as f32 / d.total_queries as f32
        } else {
            0.0
        };

        MetricsSnapshot {
            total_queries: d.total_queries,
            no_matches: d.no_matches,
            errors: d.errors,
            no_match_rate,
            p50: percentile(&sorted_latencies, 50.0),
            p95: percentile(&sorted_latencies, 95.0),
            p99: percentile(&sorted_latencies, 99.0),
            history_count: d.latencies.len(),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new(1_024)
    }
}

fn percentile(sorted: &[u64], p: f32) -> u64 {
    if sorted.is_empty() {
        return 0;
    }
    let idx = ((p / 100.0) * (sorted.len() as f32)).ceil() as usize;
    sorted[idx.saturating_sub(1).min(sorted.len() - 1)]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub total_queries: u64,
    pub no_matches: u64,
    pub errors: u64,
    pub no_match_rate: f32,
    pub p50: u64,
    pub p95: u64,
    pub p99: u64,
    pub history_count: usize,
}
