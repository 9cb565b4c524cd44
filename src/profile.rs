use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::catalog::{MealType, Season};

/// Biological sex for the BMR equation. Anything other than "male"
/// (case-insensitive) reads as `Female`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Sex {
    Male,
    Female,
}

impl From<&str> for Sex {
    fn from(value: &str) -> Self {
        if value.eq_ignore_ascii_case("male") {
            Sex::Male
        } else {
            Sex::Female
        }
    }
}

impl From<String> for Sex {
    fn from(value: String) -> Self {
        Sex::from(value.as_str())
    }
}

/// Activity level; unrecognized names fall back to `Sedentary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];

    /// TDEE multiplier applied to BMR.
    pub fn factor(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

impl From<&str> for ActivityLevel {
    fn from(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "light" => ActivityLevel::Light,
            "moderate" => ActivityLevel::Moderate,
            "active" => ActivityLevel::Active,
            "very_active" => ActivityLevel::VeryActive,
            "sedentary" => ActivityLevel::Sedentary,
            _ => ActivityLevel::Sedentary,
        }
    }
}

impl From<String> for ActivityLevel {
    fn from(value: String) -> Self {
        ActivityLevel::from(value.as_str())
    }
}

/// Weight goal; unrecognized names fall back to `Maintain`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Goal {
    LoseWeight,
    Maintain,
    GainWeight,
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::LoseWeight => "lose_weight",
            Goal::Maintain => "maintain",
            Goal::GainWeight => "gain_weight",
        }
    }
}

impl From<&str> for Goal {
    fn from(value: &str) -> Self {
        match value {
            "lose_weight" => Goal::LoseWeight,
            "gain_weight" => Goal::GainWeight,
            "maintain" => Goal::Maintain,
            _ => Goal::Maintain,
        }
    }
}

impl From<String> for Goal {
    fn from(value: String) -> Self {
        Goal::from(value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub age: u32,
    pub sex: Sex,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    #[serde(default)]
    pub diet_type: Option<String>,
    /// Preferred cuisines per meal; a missing or null entry means any cuisine.
    #[serde(default)]
    pub cuisines: BTreeMap<MealType, Option<Vec<String>>>,
    #[serde(default)]
    pub allergies: Vec<String>,
    /// Explicit season; the calendar month decides when absent or blank.
    #[serde(default, deserialize_with = "deserialize_season")]
    pub season: Option<Season>,
}

/// Accepts any case and "autumn"; blank or null means no override.
fn deserialize_season<'de, D>(deserializer: D) -> Result<Option<Season>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(name) => name.parse::<Season>().map(Some).map_err(serde::de::Error::custom),
    }
}

impl UserProfile {
    pub fn cuisines_for(&self, meal: MealType) -> Option<Vec<String>> {
        self.cuisines.get(&meal).cloned().flatten()
    }
}
