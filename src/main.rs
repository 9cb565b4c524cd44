use anyhow::{anyhow, Context, Result};
use std::path::Path;
use tokio::fs;
use tracing_subscriber::EnvFilter;

use meal_recommender::catalog::MealType;
use meal_recommender::cli::{parse_args, Command, ProfileArgs};
use meal_recommender::config::EngineConfig;
use meal_recommender::engine::{RecommenderContext, SimilarityCachePolicy};
use meal_recommender::plan_store::save_meal_plan;
use meal_recommender::planning::energy::recommend_goal;
use meal_recommender::planning::meal_planner::{MealPlan, MealRecommendation};
use meal_recommender::planning::seasonal::SeasonalRecommendations;
use meal_recommender::profile::UserProfile;

const SEASONAL_ITEMS_PER_MEAL: usize = 3;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("meal_recommender=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn load_profile(args: &ProfileArgs) -> Result<UserProfile> {
    if let Some(path) = &args.profile {
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read profile file '{}'", path.display()))?;
        return serde_json::from_str(&contents)
            .with_context(|| format!("Invalid profile JSON in '{}'", path.display()));
    }
    args.to_profile()
        .ok_or_else(|| anyhow!("--age, --weight and --height are required without --profile"))
}

fn print_plan(plan: &MealPlan) {
    let t = &plan.daily_targets;
    println!("\nDaily targets ({} season)", plan.current_season);
    println!("  BMR: {} kcal | TDEE: {} kcal", t.bmr, t.tdee);
    println!("  Calories: {} kcal", t.daily_calories);
    println!("  Protein: {} g | Fat: {} g | Carbs: {} g", t.protein_g, t.fat_g, t.carbs_g);

    for (meal, recommendation) in &plan.meals {
        match recommendation {
            MealRecommendation::Options {
                target_calories,
                options,
            } => {
                println!("\n{} (target {} kcal)", meal, target_calories);
                for (i, option) in options.iter().enumerate() {
                    println!(
                        "  {}. {} [{}] - {:.0} kcal, {:.1} g protein, {} cuisine (off by {:.0} kcal)",
                        i + 1,
                        option.food.food_name,
                        option.food.food_id,
                        option.food.calories,
                        option.food.protein_g,
                        option.food.cuisine_type,
                        option.calorie_diff
                    );
                }
            }
            MealRecommendation::Unavailable { error } => {
                println!("\n{}: {}", meal, error);
            }
        }
    }
}

fn print_seasonal(recs: &SeasonalRecommendations, limit: usize) {
    for food in recs.foods.iter().take(limit) {
        println!(
            "  - {} [{}] - {:.0} kcal, {:.1} g protein ({})",
            food.food_name, food.food_id, food.calories, food.protein_g, food.diet_type
        );
    }
}

async fn run_plan(
    context: &RecommenderContext,
    args: &ProfileArgs,
    save: Option<Option<&Path>>,
    seasonal: bool,
) -> Result<()> {
    let profile = load_profile(args).await?;
    let plan = context.planner().plan(&profile);
    print_plan(&plan);

    if seasonal {
        let advisor = context.seasonal_advisor();
        for meal in MealType::ALL {
            let cuisines = profile.cuisines_for(meal);
            let recs = advisor.recommend(profile.diet_type.as_deref(), Some(meal), cuisines.as_deref());
            println!("\nSeasonal picks for {} ({})", meal, recs.season);
            print_seasonal(&recs, SEASONAL_ITEMS_PER_MEAL);
        }
    }

    if let Some(path) = save {
        let saved = save_meal_plan(&plan, path).context("Failed to save meal plan")?;
        println!("\nMeal plan saved to {}", saved.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = parse_args();
    let config = cli.apply_overrides(
        EngineConfig::from_env().context("Failed to read configuration from environment")?,
    );

    // goal needs no catalog or models
    if let Command::Goal { profile } = &cli.command {
        let profile = load_profile(profile).await?;
        let recommendation =
            recommend_goal(profile.age, profile.sex, profile.weight_kg, profile.height_cm);
        println!("Recommended goal: {}", recommendation.goal.as_str());
        println!("BMI: {:.1}", recommendation.bmi);
        println!("{}", recommendation.explanation);
        return Ok(());
    }

    let policy = match &cli.command {
        Command::RebuildSimilarity => SimilarityCachePolicy::Rebuild,
        _ => SimilarityCachePolicy::UseCache,
    };
    let context = RecommenderContext::initialize_with(&config, policy).with_context(|| {
        format!(
            "Failed to initialize recommender from '{}' and '{}'",
            config.catalog_path.display(),
            config.models_dir.display()
        )
    })?;

    match &cli.command {
        Command::Plan {
            profile,
            save,
            seasonal,
        } => {
            let save = save.as_ref().map(|p| p.as_deref());
            run_plan(&context, profile, save, *seasonal).await?;
        }
        Command::Similar { food_id, top } => {
            if context.catalog().find(food_id).is_none() {
                return Err(anyhow!("Unknown food_id '{}'", food_id));
            }
            let similar = context.similar_foods(food_id, *top);
            println!("Foods similar to {}:", food_id);
            for (i, food) in similar.iter().enumerate() {
                println!(
                    "  {}. {} [{}] - similarity {:.3}, {:.0} kcal, {:.1} g protein ({})",
                    i + 1,
                    food.food_name,
                    food.food_id,
                    food.similarity,
                    food.calories,
                    food.protein_g,
                    food.diet_type
                );
            }
        }
        Command::Seasonal {
            diet_type,
            meal_type,
            cuisines,
        } => {
            let cuisines = (!cuisines.is_empty()).then_some(cuisines.as_slice());
            let recs = context
                .seasonal_advisor()
                .recommend(diet_type.as_deref(), *meal_type, cuisines);
            println!("In-season foods for {}:", recs.season);
            print_seasonal(&recs, recs.foods.len());
        }
        Command::RebuildSimilarity => {
            println!(
                "Similarity matrix rebuilt for {} foods at {}",
                context.catalog().len(),
                config.similarity_cache_path.display()
            );
        }
        Command::Goal { .. } => {}
    }

    Ok(())
}
