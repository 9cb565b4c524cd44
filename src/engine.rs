use std::time::Instant;
use tracing::info;

use crate::catalog::{load_food_catalog, FoodCatalog};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::model_store::ModelStore;
use crate::planning::meal_planner::MealPlanner;
use crate::planning::seasonal::SeasonalAdvisor;
use crate::search::constraint_filter::ConstraintFilter;
use crate::search::similarity_index::{SimilarFood, SimilarityIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimilarityCachePolicy {
    /// Reuse a cached matrix that matches the catalog.
    #[default]
    UseCache,
    /// Always recompute and overwrite the cache.
    Rebuild,
}

/// Everything loaded once at startup and shared read-only by every
/// recommendation call.
pub struct RecommenderContext {
    catalog: FoodCatalog,
    models: ModelStore,
    similarity: SimilarityIndex,
    random_seed: Option<u64>,
}

impl RecommenderContext {
    pub fn initialize(config: &EngineConfig) -> Result<Self> {
        Self::initialize_with(config, SimilarityCachePolicy::UseCache)
    }

    pub fn initialize_with(config: &EngineConfig, policy: SimilarityCachePolicy) -> Result<Self> {
        let started = Instant::now();
        info!(catalog = ?config.catalog_path, "Initializing recommender");

        let catalog = load_food_catalog(&config.catalog_path)?;
        info!(items = catalog.len(), "Food catalog loaded");

        let models = ModelStore::load(&config.models_dir)?;

        let cache_path = config.similarity_cache_path.as_path();
        let similarity = match policy {
            SimilarityCachePolicy::UseCache => {
                SimilarityIndex::load_or_build(&catalog, &models.scaler, cache_path)?
            }
            SimilarityCachePolicy::Rebuild => {
                SimilarityIndex::rebuild(&catalog, &models.scaler, cache_path)?
            }
        };

        info!(elapsed_ms = started.elapsed().as_millis() as u64, "Recommender ready");
        Ok(Self::from_parts(catalog, models, similarity, config.random_seed))
    }

    pub fn from_parts(
        catalog: FoodCatalog,
        models: ModelStore,
        similarity: SimilarityIndex,
        random_seed: Option<u64>,
    ) -> Self {
        Self {
            catalog,
            models,
            similarity,
            random_seed,
        }
    }

    pub fn catalog(&self) -> &FoodCatalog {
        &self.catalog
    }

    pub fn models(&self) -> &ModelStore {
        &self.models
    }

    pub fn similarity(&self) -> &SimilarityIndex {
        &self.similarity
    }

    pub fn filter(&self) -> ConstraintFilter<'_> {
        ConstraintFilter::new(&self.catalog).with_seed(self.random_seed)
    }

    pub fn planner(&self) -> MealPlanner<'_> {
        MealPlanner::new(self.filter())
    }

    pub fn seasonal_advisor(&self) -> SeasonalAdvisor<'_> {
        SeasonalAdvisor::new(self.filter())
    }

    pub fn similar_foods(&self, food_id: &str, top_n: usize) -> Vec<SimilarFood> {
        self.similarity.query(&self.catalog, food_id, top_n)
    }
}
