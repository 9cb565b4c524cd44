use std::path::{Path, PathBuf};

use crate::error::{RecommenderError, Result};

pub const CATALOG_ENV_VAR: &str = "MEAL_RECOMMENDER_CATALOG";
pub const MODELS_DIR_ENV_VAR: &str = "MEAL_RECOMMENDER_MODELS_DIR";
pub const SIMILARITY_CACHE_ENV_VAR: &str = "MEAL_RECOMMENDER_SIMILARITY_CACHE";
pub const SEED_ENV_VAR: &str = "MEAL_RECOMMENDER_SEED";

pub const DEFAULT_CATALOG_PATH: &str = "seasonal_food_database.csv";
pub const DEFAULT_MODELS_DIR: &str = "./";
pub const SIMILARITY_CACHE_FILE: &str = "similarity_matrix.bin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub catalog_path: PathBuf,
    pub models_dir: PathBuf,
    pub similarity_cache_path: PathBuf,
    /// Seed for the random-sample filter fallback; unseeded when `None`.
    pub random_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_PATH, DEFAULT_MODELS_DIR)
    }
}

impl EngineConfig {
    pub fn new(catalog_path: impl Into<PathBuf>, models_dir: impl Into<PathBuf>) -> Self {
        let models_dir = models_dir.into();
        Self {
            catalog_path: catalog_path.into(),
            similarity_cache_path: default_cache_path(&models_dir),
            models_dir,
            random_seed: None,
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to defaults for
    /// unset or blank keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::new(
            get(CATALOG_ENV_VAR).unwrap_or_else(|| DEFAULT_CATALOG_PATH.to_string()),
            get(MODELS_DIR_ENV_VAR).unwrap_or_else(|| DEFAULT_MODELS_DIR.to_string()),
        );
        if let Some(cache) = get(SIMILARITY_CACHE_ENV_VAR) {
            config.similarity_cache_path = PathBuf::from(cache);
        }
        if let Some(seed) = get(SEED_ENV_VAR) {
            let seed = seed.trim().parse::<u64>().map_err(|e| {
                RecommenderError::InvalidConfig(format!("{} '{}': {}", SEED_ENV_VAR, seed, e))
            })?;
            config.random_seed = Some(seed);
        }
        Ok(config)
    }
}

pub fn default_cache_path(models_dir: &Path) -> PathBuf {
    models_dir.join(SIMILARITY_CACHE_FILE)
}
