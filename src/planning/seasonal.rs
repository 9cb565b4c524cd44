use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::catalog::{FoodItem, MealType, Season};
use crate::planning::meal_planner::resolve_season;
use crate::search::constraint_filter::{ConstraintFilter, FilterCriteria};

pub const SEASONAL_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalRecommendations {
    pub season: Season,
    pub foods: Vec<FoodItem>,
}

/// In-season foods ranked by protein density.
pub struct SeasonalAdvisor<'a> {
    filter: ConstraintFilter<'a>,
}

impl<'a> SeasonalAdvisor<'a> {
    pub fn new(filter: ConstraintFilter<'a>) -> Self {
        Self { filter }
    }

    pub fn recommend(
        &self,
        diet_type: Option<&str>,
        meal_type: Option<MealType>,
        cuisines: Option<&[String]>,
    ) -> SeasonalRecommendations {
        self.recommend_on(diet_type, meal_type, cuisines, Local::now().date_naive())
    }

    pub fn recommend_on(
        &self,
        diet_type: Option<&str>,
        meal_type: Option<MealType>,
        cuisines: Option<&[String]>,
        today: NaiveDate,
    ) -> SeasonalRecommendations {
        let season = resolve_season(None, today);
        let criteria = FilterCriteria {
            diet_type: diet_type.map(str::to_string),
            meal_type,
            season: Some(season),
            cuisines: cuisines.map(<[String]>::to_vec),
            allergens: Vec::new(),
        };

        let mut foods = self.filter.filter(&criteria);
        foods.sort_by(|a, b| b.protein_ratio().total_cmp(&a.protein_ratio()));
        foods.truncate(SEASONAL_LIMIT);

        SeasonalRecommendations {
            season,
            foods: foods.into_iter().cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::food_item::test_support::food;
    use crate::catalog::FoodCatalog;

    fn ids(recs: &SeasonalRecommendations) -> Vec<&str> {
        recs.foods.iter().map(|f| f.food_id.as_str()).collect()
    }

    #[test]
    fn test_ranked_by_protein_ratio() {
        let mut tofu = food("tofu", "Vegan", "Japanese", 150.0, 15.0);
        tofu.winter = false;
        let catalog = FoodCatalog::new(vec![
            food("rice", "Vegan", "Japanese", 200.0, 4.0),
            tofu,
            food("lentils", "Vegan", "Indian", 230.0, 18.0),
            food("water", "Vegan", "Indian", 0.0, 0.5),
            food("chicken", "Regular", "Indian", 165.0, 31.0),
        ])
        .unwrap();
        let advisor = SeasonalAdvisor::new(ConstraintFilter::new(&catalog));

        let july = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        let summer = advisor.recommend_on(Some("Vegan"), None, None, july);
        assert_eq!(summer.season, Season::Summer);
        // water: 0.5 protein over a calorie floor of 1
        assert_eq!(ids(&summer), vec!["water", "tofu", "lentils", "rice"]);

        let january = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let winter = advisor.recommend_on(Some("Vegan"), None, None, january);
        assert_eq!(winter.season, Season::Winter);
        assert_eq!(ids(&winter), vec!["water", "lentils", "rice"]);
    }

    #[test]
    fn test_limited_to_ten() {
        let items: Vec<FoodItem> = (0..25)
            .map(|i| food(&format!("f{i}"), "Vegan", "Thai", 100.0, f64::from(i)))
            .collect();
        let catalog = FoodCatalog::new(items).unwrap();
        let advisor = SeasonalAdvisor::new(ConstraintFilter::new(&catalog));

        let cuisines = vec!["Thai".to_string()];
        let recs = advisor.recommend(None, Some(MealType::Lunch), Some(&cuisines));
        assert_eq!(recs.foods.len(), SEASONAL_LIMIT);
        assert_eq!(recs.foods[0].food_id, "f24");
        assert_eq!(recs.foods[9].food_id, "f15");
    }

    #[test]
    fn test_allergens_are_not_filtered() {
        let mut satay = food("satay", "Vegan", "Thai", 400.0, 20.0);
        satay.allergens = Some("Peanut".to_string());
        let catalog = FoodCatalog::new(vec![satay]).unwrap();
        let advisor = SeasonalAdvisor::new(ConstraintFilter::new(&catalog));

        let recs = advisor.recommend(None, None, None);
        assert_eq!(ids(&recs), vec!["satay"]);
    }
}
