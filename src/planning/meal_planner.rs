use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::catalog::{FoodItem, MealType, Season};
use crate::planning::energy::{compute_targets, round_target, EnergyTargets};
use crate::profile::UserProfile;
use crate::search::constraint_filter::{ConstraintFilter, FilterCriteria};

/// Share of daily calories per meal, in percent. Sums to 100.
pub const MEAL_DISTRIBUTION: [(MealType, u32); 4] = [
    (MealType::Breakfast, 25),
    (MealType::Lunch, 35),
    (MealType::Dinner, 30),
    (MealType::Snack, 10),
];

pub const OPTIONS_PER_MEAL: usize = 3;

/// Season for `today`, unless the caller fixed one.
pub fn resolve_season(explicit: Option<Season>, today: NaiveDate) -> Season {
    explicit.unwrap_or_else(|| Season::from_month(today.month()))
}

pub fn current_season() -> Season {
    Season::from_month(Local::now().month())
}

/// Unrounded calorie budget of one meal.
pub fn meal_calories(daily_calories: u32, meal: MealType) -> f64 {
    let percent = MEAL_DISTRIBUTION
        .iter()
        .find(|(m, _)| *m == meal)
        .map(|(_, p)| *p)
        .unwrap_or(0);
    f64::from(daily_calories) * f64::from(percent) / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealOption {
    #[serde(flatten)]
    pub food: FoodItem,
    /// Absolute distance between the item's calories and the meal target.
    pub calorie_diff: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MealRecommendation {
    Options {
        target_calories: u32,
        options: Vec<MealOption>,
    },
    Unavailable {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    pub daily_targets: EnergyTargets,
    pub current_season: Season,
    pub meals: BTreeMap<MealType, MealRecommendation>,
}

pub struct MealPlanner<'a> {
    filter: ConstraintFilter<'a>,
}

impl<'a> MealPlanner<'a> {
    pub fn new(filter: ConstraintFilter<'a>) -> Self {
        Self { filter }
    }

    pub fn plan(&self, profile: &UserProfile) -> MealPlan {
        self.plan_on(profile, Local::now().date_naive())
    }

    /// Builds the day's plan as of `today`, which only matters for the
    /// season when the profile does not set one.
    pub fn plan_on(&self, profile: &UserProfile, today: NaiveDate) -> MealPlan {
        let daily_targets = compute_targets(profile);
        let season = resolve_season(profile.season, today);
        info!(
            daily_calories = daily_targets.daily_calories,
            %season,
            "Planning meals"
        );

        let meals = MEAL_DISTRIBUTION
            .iter()
            .map(|(meal, _)| {
                let recommendation =
                    self.recommend_meal(profile, *meal, season, daily_targets.daily_calories);
                (*meal, recommendation)
            })
            .collect();

        MealPlan {
            daily_targets,
            current_season: season,
            meals,
        }
    }

    fn recommend_meal(
        &self,
        profile: &UserProfile,
        meal: MealType,
        season: Season,
        daily_calories: u32,
    ) -> MealRecommendation {
        let target = meal_calories(daily_calories, meal);
        let criteria = FilterCriteria {
            diet_type: profile.diet_type.clone(),
            meal_type: Some(meal),
            season: Some(season),
            cuisines: profile.cuisines_for(meal),
            allergens: profile.allergies.clone(),
        };

        let candidates = self.filter.filter(&criteria);
        if candidates.is_empty() {
            return MealRecommendation::Unavailable {
                error: format!("No suitable {} options found with your constraints", meal),
            };
        }

        let mut ranked: Vec<MealOption> = candidates
            .into_iter()
            .map(|food| MealOption {
                calorie_diff: (food.calories - target).abs(),
                food: food.clone(),
            })
            .collect();
        // stable: equal distances keep catalog order
        ranked.sort_by(|a, b| a.calorie_diff.total_cmp(&b.calorie_diff));
        ranked.truncate(OPTIONS_PER_MEAL);
        debug!(%meal, target, options = ranked.len(), "Meal ranked");

        MealRecommendation::Options {
            target_calories: round_target(target),
            options: ranked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::food_item::test_support::food;
    use crate::catalog::FoodCatalog;
    use crate::profile::{ActivityLevel, Goal, Sex};

    fn profile() -> UserProfile {
        UserProfile {
            age: 30,
            sex: Sex::Male,
            weight_kg: 80.0,
            height_cm: 180.0,
            activity_level: ActivityLevel::Sedentary,
            goal: Goal::Maintain,
            diet_type: Some("Vegan".to_string()),
            cuisines: BTreeMap::new(),
            allergies: vec!["peanut".to_string()],
            season: Some(Season::Summer),
        }
    }

    fn catalog() -> FoodCatalog {
        let mut items = vec![
            food("1", "Vegan", "Thai", 520.0, 18.0),
            food("2", "Vegan", "Thai", 480.0, 12.0),
            food("3", "Vegan", "Greek", 700.0, 25.0),
            food("4", "Vegan", "Greek", 250.0, 6.0),
            food("5", "Regular", "French", 534.0, 40.0),
            food("6", "Vegan", "Thai", 534.0, 20.0),
        ];
        items[5].allergens = Some("Peanuts".to_string());
        items[3].suitable_breakfast = false;
        FoodCatalog::new(items).unwrap()
    }

    fn options(plan: &MealPlan, meal: MealType) -> (u32, Vec<String>) {
        match &plan.meals[&meal] {
            MealRecommendation::Options {
                target_calories,
                options,
            } => (
                *target_calories,
                options.iter().map(|o| o.food.food_id.clone()).collect(),
            ),
            MealRecommendation::Unavailable { error } => panic!("unexpected error: {error}"),
        }
    }

    #[test]
    fn test_distribution_sums_to_hundred() {
        let total: u32 = MEAL_DISTRIBUTION.iter().map(|(_, p)| p).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_meal_targets_for_2000_calories() {
        assert_eq!(round_target(meal_calories(2000, MealType::Breakfast)), 500);
        assert_eq!(round_target(meal_calories(2000, MealType::Lunch)), 700);
        assert_eq!(round_target(meal_calories(2000, MealType::Dinner)), 600);
        assert_eq!(round_target(meal_calories(2000, MealType::Snack)), 200);
    }

    #[test]
    fn test_meal_share_uses_exact_percentages() {
        // 1410 * 35 / 100 is exactly 493.5, which rounds to even
        assert_eq!(meal_calories(1410, MealType::Lunch), 493.5);
        assert_eq!(round_target(meal_calories(1410, MealType::Lunch)), 494);
        assert_eq!(round_target(meal_calories(1410, MealType::Breakfast)), 352); // 352.5
    }

    #[test]
    fn test_resolve_season() {
        let july = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        assert_eq!(resolve_season(None, july), Season::Summer);
        assert_eq!(resolve_season(Some(Season::Winter), july), Season::Winter);
        let december = NaiveDate::from_ymd_opt(2024, 12, 24).unwrap();
        assert_eq!(resolve_season(None, december), Season::Winter);
    }

    #[test]
    fn test_plan_ranks_by_calorie_distance() {
        let catalog = catalog();
        let planner = MealPlanner::new(ConstraintFilter::new(&catalog));
        let plan = planner.plan(&profile());

        // 2136 kcal: breakfast 534, lunch 747.6, dinner 640.8, snack 213.6
        assert_eq!(plan.daily_targets.daily_calories, 2136);
        assert_eq!(plan.current_season, Season::Summer);

        // item 4 is not a breakfast food, 5 is not vegan, 6 contains peanuts
        let (target, ids) = options(&plan, MealType::Breakfast);
        assert_eq!(target, 534);
        assert_eq!(ids, vec!["1", "2", "3"]);

        let (target, ids) = options(&plan, MealType::Lunch);
        assert_eq!(target, 748);
        assert_eq!(ids, vec!["3", "1", "2"]);

        let (target, ids) = options(&plan, MealType::Snack);
        assert_eq!(target, 214);
        assert_eq!(ids, vec!["4", "2", "1"]);
    }

    #[test]
    fn test_equal_distance_keeps_catalog_order() {
        let catalog = FoodCatalog::new(vec![
            food("a", "Vegan", "Thai", 600.0, 1.0),
            food("b", "Vegan", "Thai", 468.0, 1.0),
            food("c", "Vegan", "Thai", 600.0, 1.0),
        ])
        .unwrap();
        let planner = MealPlanner::new(ConstraintFilter::new(&catalog));
        let plan = planner.plan(&profile());
        // breakfast target 534: a and c are 66 above, b is 66 below
        let (_, ids) = options(&plan, MealType::Breakfast);
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_cuisine_preference_per_meal() {
        let catalog = catalog();
        let planner = MealPlanner::new(ConstraintFilter::new(&catalog));
        let mut profile = profile();
        profile
            .cuisines
            .insert(MealType::Dinner, Some(vec!["Greek".to_string()]));

        let plan = planner.plan(&profile);
        let (_, ids) = options(&plan, MealType::Dinner);
        assert_eq!(ids, vec!["3", "4"]);
    }

    #[test]
    fn test_plan_is_deterministic() {
        let catalog = catalog();
        let planner = MealPlanner::new(ConstraintFilter::new(&catalog));
        let today = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();
        let mut profile = profile();
        profile.season = None;

        let first = planner.plan_on(&profile, today);
        let second = planner.plan_on(&profile, today);
        assert_eq!(first, second);
        assert_eq!(first.current_season, Season::Spring);
    }

    #[test]
    fn test_empty_catalog_yields_per_meal_errors() {
        let catalog = FoodCatalog::new(Vec::new()).unwrap();
        let planner = MealPlanner::new(ConstraintFilter::new(&catalog));
        let plan = planner.plan(&profile());

        assert_eq!(plan.meals.len(), 4);
        assert_eq!(plan.daily_targets.daily_calories, 2136);
        match &plan.meals[&MealType::Lunch] {
            MealRecommendation::Unavailable { error } => {
                assert_eq!(error, "No suitable lunch options found with your constraints")
            }
            other => panic!("expected error entry, got {other:?}"),
        }
    }

    #[test]
    fn test_plan_json_round_trip() {
        let catalog = catalog();
        let planner = MealPlanner::new(ConstraintFilter::new(&catalog));
        let mut plan = planner.plan(&profile());
        plan.meals.insert(
            MealType::Snack,
            MealRecommendation::Unavailable {
                error: "No suitable snack options found with your constraints".to_string(),
            },
        );

        let json = serde_json::to_string_pretty(&plan).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["daily_targets"]["daily_calories"], 2136);
        assert_eq!(value["current_season"], "summer");
        assert_eq!(value["meals"]["breakfast"]["target_calories"], 534);
        assert_eq!(value["meals"]["breakfast"]["options"][0]["food_id"], "1");
        assert!(value["meals"]["snack"]["error"].is_string());

        let parsed: MealPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, plan);
    }
}
