pub mod energy;
pub mod meal_planner;
pub mod seasonal;

pub use energy::{
    compute_energy, compute_targets, recommend_goal, EnergyEstimate, EnergyTargets,
    GoalRecommendation,
};
pub use meal_planner::{MealOption, MealPlan, MealPlanner, MealRecommendation};
pub use seasonal::{SeasonalAdvisor, SeasonalRecommendations};
