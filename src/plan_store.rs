use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{RecommenderError, Result};
use crate::planning::meal_planner::MealPlan;

/// `meal_plan_YYYYMMDD_HHMMSS.json` for the given local time.
pub fn default_plan_file_name(at: NaiveDateTime) -> String {
    format!("meal_plan_{}.json", at.format("%Y%m%d_%H%M%S"))
}

/// Writes the plan as pretty JSON and returns where it went. Without a path
/// the file is named after the current local time in the working directory.
pub fn save_meal_plan(plan: &MealPlan, path: Option<&Path>) -> Result<PathBuf> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(default_plan_file_name(chrono::Local::now().naive_local())),
    };
    let json = serde_json::to_string_pretty(plan)?;
    std::fs::write(&path, json)?;
    info!(?path, "Meal plan saved");
    Ok(path)
}

pub fn load_meal_plan(path: &Path) -> Result<MealPlan> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| RecommenderError::unavailable(path, e))?;
    Ok(serde_json::from_str(&contents)?)
}
