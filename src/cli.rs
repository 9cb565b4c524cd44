use clap::{Args, Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::catalog::{MealType, Season};
use crate::config::EngineConfig;
use crate::profile::{ActivityLevel, Goal, Sex, UserProfile};

#[derive(Parser, Debug)]
#[command(author, version, about = "Personalized meal recommendations", long_about = None)]
pub struct Cli {
    /// Food catalog CSV (overrides MEAL_RECOMMENDER_CATALOG)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Directory holding the model artifacts (overrides MEAL_RECOMMENDER_MODELS_DIR)
    #[arg(long, global = true)]
    pub models_dir: Option<PathBuf>,

    /// Similarity matrix cache file (overrides MEAL_RECOMMENDER_SIMILARITY_CACHE)
    #[arg(long, global = true)]
    pub similarity_cache: Option<PathBuf>,

    /// Seed for the random fallback (overrides MEAL_RECOMMENDER_SEED)
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute daily targets and recommend options for every meal
    Plan {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Save the plan as JSON; without a value a timestamped name is used
        #[arg(long, num_args = 0..=1, value_name = "PATH")]
        save: Option<Option<PathBuf>>,

        /// Also list the top seasonal foods for each meal
        #[arg(long)]
        seasonal: bool,
    },
    /// Suggest a goal from the profile's BMI
    Goal {
        #[command(flatten)]
        profile: ProfileArgs,
    },
    /// List the foods most similar to a catalog item
    Similar {
        #[arg(long)]
        food_id: String,
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
    /// List in-season foods ranked by protein density
    Seasonal {
        #[arg(long)]
        diet_type: Option<String>,
        #[arg(long)]
        meal_type: Option<MealType>,
        #[arg(long = "cuisine")]
        cuisines: Vec<String>,
    },
    /// Recompute the similarity matrix and overwrite the cache
    RebuildSimilarity,
}

#[derive(Args, Debug, Clone)]
pub struct ProfileArgs {
    /// User profile as a JSON file; replaces the individual flags
    #[arg(long, value_name = "JSON")]
    pub profile: Option<PathBuf>,

    #[arg(long, required_unless_present = "profile")]
    pub age: Option<u32>,
    #[arg(long, default_value = "male")]
    pub sex: String,
    #[arg(long, required_unless_present = "profile")]
    pub weight: Option<f64>,
    #[arg(long, required_unless_present = "profile")]
    pub height: Option<f64>,
    #[arg(long, default_value = "sedentary")]
    pub activity: String,
    #[arg(long, default_value = "maintain")]
    pub goal: String,
    #[arg(long)]
    pub diet_type: Option<String>,
    /// Preferred cuisine for every meal; repeatable
    #[arg(long = "cuisine")]
    pub cuisines: Vec<String>,
    /// Allergen to avoid; repeatable
    #[arg(long = "allergy")]
    pub allergies: Vec<String>,
    #[arg(long)]
    pub season: Option<Season>,
}

impl ProfileArgs {
    /// Profile from the individual flags, or `None` when a required one is
    /// missing.
    pub fn to_profile(&self) -> Option<UserProfile> {
        let cuisines = if self.cuisines.is_empty() {
            BTreeMap::new()
        } else {
            MealType::ALL
                .iter()
                .map(|meal| (*meal, Some(self.cuisines.clone())))
                .collect()
        };

        Some(UserProfile {
            age: self.age?,
            sex: Sex::from(self.sex.as_str()),
            weight_kg: self.weight?,
            height_cm: self.height?,
            activity_level: ActivityLevel::from(self.activity.as_str()),
            goal: Goal::from(self.goal.as_str()),
            diet_type: self.diet_type.clone(),
            cuisines,
            allergies: self.allergies.clone(),
            season: self.season,
        })
    }
}

impl Cli {
    /// Applies the command-line overrides on top of `base`.
    pub fn apply_overrides(&self, mut base: EngineConfig) -> EngineConfig {
        if let Some(models_dir) = &self.models_dir {
            base.models_dir = models_dir.clone();
            if self.similarity_cache.is_none() {
                base.similarity_cache_path = crate::config::default_cache_path(models_dir);
            }
        }
        if let Some(catalog) = &self.catalog {
            base.catalog_path = catalog.clone();
        }
        if let Some(cache) = &self.similarity_cache {
            base.similarity_cache_path = cache.clone();
        }
        if self.seed.is_some() {
            base.random_seed = self.seed;
        }
        base
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
