use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    /// Name of the catalog column carrying this meal's suitability flag.
    pub fn suitability_column(&self) -> &'static str {
        match self {
            MealType::Breakfast => "suitable_breakfast",
            MealType::Lunch => "suitable_lunch",
            MealType::Dinner => "suitable_dinner",
            MealType::Snack => "suitable_snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            other => Err(format!("unknown meal type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    /// Northern-hemisphere mapping: Mar-May spring, Jun-Aug summer, Sep-Nov fall, Dec-Feb winter.
    pub fn from_month(month: u32) -> Season {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Fall,
            _ => Season::Winter,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
            Season::Winter => "winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "fall" | "autumn" => Ok(Season::Fall),
            "winter" => Ok(Season::Winter),
            other => Err(format!("unknown season '{}'", other)),
        }
    }
}

/// One row of the food database. Field names match the catalog columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub food_id: String,
    pub food_name: String,
    pub diet_type: String,
    pub cuisine_type: String,
    pub calories: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbs_g: f64,
    #[serde(default)]
    pub suitable_breakfast: bool,
    #[serde(default)]
    pub suitable_lunch: bool,
    #[serde(default)]
    pub suitable_dinner: bool,
    #[serde(default)]
    pub suitable_snack: bool,
    #[serde(default)]
    pub spring: bool,
    #[serde(default)]
    pub summer: bool,
    #[serde(default)]
    pub fall: bool,
    #[serde(default)]
    pub winter: bool,
    pub allergens: Option<String>,
    /// Numeric catalog columns beyond the core macros (fiber_g, sodium_mg, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_nutrients: BTreeMap<String, f64>,
}

impl FoodItem {
    pub fn is_suitable_for(&self, meal: MealType) -> bool {
        match meal {
            MealType::Breakfast => self.suitable_breakfast,
            MealType::Lunch => self.suitable_lunch,
            MealType::Dinner => self.suitable_dinner,
            MealType::Snack => self.suitable_snack,
        }
    }

    pub fn in_season(&self, season: Season) -> bool {
        match season {
            Season::Spring => self.spring,
            Season::Summer => self.summer,
            Season::Fall => self.fall,
            Season::Winter => self.winter,
        }
    }

    /// Case-insensitive substring match against the allergen text.
    /// Items without allergen text never match.
    pub fn contains_allergen(&self, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() {
            return false;
        }
        match self.allergens.as_deref() {
            Some(text) => text.to_lowercase().contains(&term.to_lowercase()),
            None => false,
        }
    }

    /// Numeric value of a named catalog column, or `None` if the column is unknown.
    /// Flag columns read as 0/1.
    pub fn feature_value(&self, name: &str) -> Option<f64> {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        let value = match name {
            "calories" => self.calories,
            "protein_g" => self.protein_g,
            "fat_g" => self.fat_g,
            "carbs_g" => self.carbs_g,
            "suitable_breakfast" => flag(self.suitable_breakfast),
            "suitable_lunch" => flag(self.suitable_lunch),
            "suitable_dinner" => flag(self.suitable_dinner),
            "suitable_snack" => flag(self.suitable_snack),
            "spring" => flag(self.spring),
            "summer" => flag(self.summer),
            "fall" => flag(self.fall),
            "winter" => flag(self.winter),
            other => return self.extra_nutrients.get(other).copied(),
        };
        Some(value)
    }

    /// Protein grams per calorie; zero calories count as one.
    pub fn protein_ratio(&self) -> f64 {
        let calories = if self.calories == 0.0 { 1.0 } else { self.calories };
        self.protein_g / calories
    }
}
