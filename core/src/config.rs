use crate::error::{ErrorCode, TriageError};
use crate::model::ScoringPolicy;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.45;
pub const DEFAULT_TOP_K: usize = 3;
pub const DEFAULT_ALPHA: f32 = 0.6;
pub const MAX_TOP_K: usize = 1_000;

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct DatasetConfig {
    #[serde(default)]
    pub paths: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct EmbeddingConfig {
    pub model_id: String,
    pub dimensions: usize,
    pub timeout_ms: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_id: "embedding-default-v1".to_string(),
            dimensions: 384,
            timeout_ms: 5_000,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct RankingConfig {
    pub similarity_threshold: f32,
    pub top_k: usize,
    pub alpha: f32,
    #[serde(default)]
    pub policy: ScoringPolicy,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            top_k: DEFAULT_TOP_K,
            alpha: DEFAULT_ALPHA,
            policy: ScoringPolicy::Hybrid,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RankingConfigError {
    #[error("top_k must be between 1 and {0}")]
    InvalidTopK(usize),
    #[error("alpha must be within [0, 1], got {0}")]
    InvalidAlpha(f32),
    #[error("similarity_threshold must be within [-1, 1], got {0}")]
    InvalidThreshold(f32),
}

impl TriageError for RankingConfigError {
    fn error_code(&self) -> ErrorCode {
        ErrorCode::InvalidArgument
    }
}

impl RankingConfig {
    pub fn validate(&self) -> Result<(), RankingConfigError> {
        if self.top_k == 0 || self.top_k > MAX_TOP_K {
            return Err(RankingConfigError::InvalidTopK(MAX_TOP_K));
        }
        if !self.alpha.is_finite() || !(0.0..=1.0).contains(&self.alpha) {
            return Err(RankingConfigError::InvalidAlpha(self.alpha));
        }
        if !self.similarity_threshold.is_finite()
            || !(-1.0..=1.0).contains(&self.similarity_threshold)
        {
            return Err(RankingConfigError::InvalidThreshold(
                self.similarity_threshold,
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub dataset: DatasetConfig,
    pub embedding: EmbeddingConfig,
    pub ranking: RankingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_dir("config")
    }

    /// Layers built-in defaults, `<dir>/default`, `<dir>/<RUN_MODE>` and
    /// `TRIAGE_*` environment variables (`__` separates nested keys).
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let dir = dir.as_ref();
        let defaults = Self::default();

        let builder = Config::builder()
            .set_default("dataset.paths", Vec::<String>::new())?
            .set_default("embedding.model_id", defaults.embedding.model_id.clone())?
            .set_default("embedding.dimensions", defaults.embedding.dimensions as i64)?
            .set_default("embedding.timeout_ms", defaults.embedding.timeout_ms as i64)?
            .set_default(
                "ranking.similarity_threshold",
                defaults.ranking.similarity_threshold as f64,
            )?
            .set_default("ranking.top_k", defaults.ranking.top_k as i64)?
            .set_default("ranking.alpha", defaults.ranking.alpha as f64)?
            .set_default("ranking.policy", defaults.ranking.policy.as_str())?
            .add_source(File::with_name(&dir.join("default").to_string_lossy()).required(false))
            .add_source(File::with_name(&dir.join(&run_mode).to_string_lossy()).required(false))
            .add_source(
                Environment::with_prefix("TRIAGE")
                    .prefix_separator("_")
                    .separator("__"),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config
            .ranking
            .validate()
            .map_err(|err| ConfigError::Message(err.to_string()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.ranking, RankingConfig::default());
        assert_eq!(config.embedding.model_id, "embedding-default-v1");
        assert!(config.dataset.paths.is_empty());
    }

    #[test]
    fn default_file_overrides_builtins() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            "[ranking]\nalpha = 0.8\ntop_k = 5\npolicy = \"baseline\"\n\n[dataset]\npaths = [\"data/medical_dataset.json\"]\n",
        )
        .unwrap();

        let config = AppConfig::load_from_dir(dir.path()).unwrap();
        assert!((config.ranking.alpha - 0.8).abs() < 1e-6);
        assert_eq!(config.ranking.top_k, 5);
        assert_eq!(config.ranking.policy, ScoringPolicy::Baseline);
        assert!((config.ranking.similarity_threshold - 0.45).abs() < 1e-6);
        assert_eq!(config.dataset.paths, vec!["data/medical_dataset.json"]);
    }

    #[test]
    fn load_falls_back_to_builtins_without_config_dir() {
        // Tests run from the crate root, which has no `config/` directory.
        let config = AppConfig::load().unwrap();
        assert_eq!(config.ranking, RankingConfig::default());
        assert_eq!(config.embedding, EmbeddingConfig::default());
    }

    #[test]
    fn invalid_ranking_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("default.toml"), "[ranking]\nalpha = 1.5\n").unwrap();
        assert!(AppConfig::load_from_dir(dir.path()).is_err());

        let mut ranking = RankingConfig::default();
        ranking.top_k = 0;
        assert_eq!(ranking.validate(), Err(RankingConfigError::InvalidTopK(MAX_TOP_K)));
        ranking.top_k = 3;
        ranking.similarity_threshold = f32::NAN;
        assert!(ranking.validate().is_err());
    }
}
