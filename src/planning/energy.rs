use serde::{Deserialize, Serialize};

use crate::profile::{ActivityLevel, Goal, Sex, UserProfile};

const WEIGHT_LOSS_FACTOR: f64 = 0.8; // 20% deficit
const WEIGHT_GAIN_FACTOR: f64 = 1.15; // 15% surplus
const PROTEIN_G_PER_KG: f64 = 1.6;
const FAT_CALORIE_SHARE: f64 = 0.25;

// Atwater factors
const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARB: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

const BMI_UNDERWEIGHT: f64 = 18.5;
const BMI_OVERWEIGHT: f64 = 25.0;

/// Rounds half to even, then clamps to the non-negative range.
pub fn round_target(value: f64) -> u32 {
    let rounded = value.round_ties_even();
    if rounded <= 0.0 {
        0
    } else {
        rounded as u32
    }
}

/// Calorie figures for one person, before a goal is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyEstimate {
    pub bmr: u32,
    pub tdee: u32,
    pub weight_loss: u32,
    pub weight_gain: u32,
    pub maintenance: u32,
}

impl EnergyEstimate {
    pub fn calories_for(&self, goal: Goal) -> u32 {
        match goal {
            Goal::LoseWeight => self.weight_loss,
            Goal::GainWeight => self.weight_gain,
            Goal::Maintain => self.maintenance,
        }
    }
}

/// Daily energy and macronutrient targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyTargets {
    pub bmr: u32,
    pub tdee: u32,
    pub daily_calories: u32,
    pub protein_g: u32,
    pub fat_g: u32,
    pub carbs_g: u32,
}

/// Basal metabolic rate in kcal/day, Mifflin-St Jeor (1990).
pub fn mifflin_st_jeor(age: u32, sex: Sex, weight_kg: f64, height_cm: f64) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    match sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

/// Unrounded TDEE: BMR scaled by the activity factor.
pub fn total_daily_energy_expenditure(bmr: f64, activity_level: ActivityLevel) -> f64 {
    bmr * activity_level.factor()
}

pub fn compute_energy(
    age: u32,
    sex: Sex,
    weight_kg: f64,
    height_cm: f64,
    activity_level: ActivityLevel,
) -> EnergyEstimate {
    let bmr = mifflin_st_jeor(age, sex, weight_kg, height_cm);
    let tdee = total_daily_energy_expenditure(bmr, activity_level);

    EnergyEstimate {
        bmr: round_target(bmr),
        tdee: round_target(tdee),
        weight_loss: round_target(tdee * WEIGHT_LOSS_FACTOR),
        weight_gain: round_target(tdee * WEIGHT_GAIN_FACTOR),
        maintenance: round_target(tdee),
    }
}

/// Each macro is rounded on its own, so the macros need not add back up to
/// `daily_calories` exactly.
pub fn compute_targets(profile: &UserProfile) -> EnergyTargets {
    let energy = compute_energy(
        profile.age,
        profile.sex,
        profile.weight_kg,
        profile.height_cm,
        profile.activity_level,
    );
    let calories = energy.calories_for(profile.goal);
    let calories_f = f64::from(calories);

    let protein_g = profile.weight_kg * PROTEIN_G_PER_KG;
    let fat_g = calories_f * FAT_CALORIE_SHARE / KCAL_PER_G_FAT;
    let carbs_g =
        (calories_f - (protein_g * KCAL_PER_G_PROTEIN + fat_g * KCAL_PER_G_FAT)) / KCAL_PER_G_CARB;

    EnergyTargets {
        bmr: energy.bmr,
        tdee: energy.tdee,
        daily_calories: calories,
        protein_g: round_target(protein_g),
        fat_g: round_target(fat_g),
        carbs_g: round_target(carbs_g),
    }
}

pub fn body_mass_index(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalRecommendation {
    pub goal: Goal,
    pub bmi: f64,
    pub explanation: String,
}

/// Suggests a goal from BMI alone: under 18.5 gain, 25 and over lose.
/// Age and sex are part of the profile but do not move the BMI bands.
pub fn recommend_goal(_age: u32, _sex: Sex, weight_kg: f64, height_cm: f64) -> GoalRecommendation {
    let bmi = body_mass_index(weight_kg, height_cm);

    let (goal, explanation) = if bmi < BMI_UNDERWEIGHT {
        (
            Goal::GainWeight,
            format!(
                "Your BMI of {:.1} is classified as underweight. A weight gain goal is \
                 recommended to reach a healthier weight and improve energy levels.",
                bmi
            ),
        )
    } else if bmi >= BMI_OVERWEIGHT {
        (
            Goal::LoseWeight,
            format!(
                "Your BMI of {:.1} is classified as overweight. A weight loss goal is \
                 recommended to reach a healthier weight and reduce health risks.",
                bmi
            ),
        )
    } else {
        (
            Goal::Maintain,
            format!(
                "Your BMI of {:.1} is in the healthy range. A maintenance goal is \
                 recommended so you can focus on nutrition quality.",
                bmi
            ),
        )
    };

    GoalRecommendation {
        goal,
        bmi,
        explanation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn profile(goal: Goal, activity_level: ActivityLevel) -> UserProfile {
        UserProfile {
            age: 30,
            sex: Sex::Male,
            weight_kg: 80.0,
            height_cm: 180.0,
            activity_level,
            goal,
            diet_type: None,
            cuisines: BTreeMap::new(),
            allergies: Vec::new(),
            season: None,
        }
    }

    #[test]
    fn test_mifflin_st_jeor_by_sex() {
        assert_eq!(mifflin_st_jeor(30, Sex::Male, 80.0, 180.0), 1780.0);
        assert_eq!(mifflin_st_jeor(30, Sex::Female, 80.0, 180.0), 1614.0);
        assert_eq!(
            mifflin_st_jeor(30, Sex::from("robot"), 80.0, 180.0),
            mifflin_st_jeor(30, Sex::Female, 80.0, 180.0)
        );
    }

    #[test]
    fn test_tdee_uses_activity_table() {
        let bmr = mifflin_st_jeor(30, Sex::Male, 80.0, 180.0);
        let table = [
            (ActivityLevel::Sedentary, 1.2),
            (ActivityLevel::Light, 1.375),
            (ActivityLevel::Moderate, 1.55),
            (ActivityLevel::Active, 1.725),
            (ActivityLevel::VeryActive, 1.9),
        ];
        for (level, factor) in table {
            assert_eq!(total_daily_energy_expenditure(bmr, level), bmr * factor);
            let energy = compute_energy(30, Sex::Male, 80.0, 180.0, level);
            assert_eq!(energy.tdee, round_target(bmr * factor));
            assert_eq!(energy.maintenance, energy.tdee);
        }
    }

    #[test]
    fn test_unknown_activity_uses_sedentary_factor() {
        let unknown = compute_energy(30, Sex::Male, 80.0, 180.0, ActivityLevel::from("marathoner"));
        let sedentary = compute_energy(30, Sex::Male, 80.0, 180.0, ActivityLevel::Sedentary);
        assert_eq!(unknown, sedentary);
        assert_eq!(unknown.tdee, 2136);
    }

    #[test]
    fn test_goal_calorie_figures() {
        let energy = compute_energy(30, Sex::Male, 80.0, 180.0, ActivityLevel::Sedentary);
        assert_eq!(energy.bmr, 1780);
        assert_eq!(energy.weight_loss, 1709); // 1708.8
        assert_eq!(energy.weight_gain, 2456); // 2456.4
        assert_eq!(energy.maintenance, 2136);
    }

    #[test]
    fn test_round_target_half_to_even() {
        assert_eq!(round_target(272.5), 272);
        assert_eq!(round_target(273.5), 274);
        assert_eq!(round_target(0.4), 0);
        assert_eq!(round_target(-12.0), 0);
    }

    #[test]
    fn test_compute_targets_maintain() {
        let targets = compute_targets(&profile(Goal::Maintain, ActivityLevel::Sedentary));
        assert_eq!(
            targets,
            EnergyTargets {
                bmr: 1780,
                tdee: 2136,
                daily_calories: 2136,
                protein_g: 128,
                fat_g: 59,
                carbs_g: 272, // 272.5 rounds to even
            }
        );
    }

    #[test]
    fn test_compute_targets_selects_goal_calories() {
        let lose = compute_targets(&profile(Goal::LoseWeight, ActivityLevel::Sedentary));
        assert_eq!(lose.daily_calories, 1709);
        let gain = compute_targets(&profile(Goal::GainWeight, ActivityLevel::Sedentary));
        assert_eq!(gain.daily_calories, 2456);
        let unknown = compute_targets(&profile(Goal::from("recomp"), ActivityLevel::Sedentary));
        assert_eq!(unknown.daily_calories, 2136);
    }

    #[test]
    fn test_recommend_goal_bmi_bands() {
        let healthy = recommend_goal(30, Sex::Male, 70.0, 175.0);
        assert_eq!(healthy.goal, Goal::Maintain);
        assert!(healthy.explanation.contains("22.9"));
        assert!(healthy.explanation.contains("healthy range"));

        let under = recommend_goal(30, Sex::Male, 50.0, 180.0);
        assert_eq!(under.goal, Goal::GainWeight);
        assert!(under.explanation.contains("15.4"));
        assert!(under.explanation.contains("underweight"));

        let over = recommend_goal(30, Sex::Male, 90.0, 175.0);
        assert_eq!(over.goal, Goal::LoseWeight);
        assert!(over.explanation.contains("29.4"));
        assert!(over.explanation.contains("overweight"));
    }

    #[test]
    fn test_recommend_goal_ignores_age_and_sex() {
        let reference = recommend_goal(30, Sex::Male, 90.0, 175.0);
        for (age, sex) in [(18, Sex::Female), (65, Sex::Male), (90, Sex::from("other"))] {
            assert_eq!(recommend_goal(age, sex, 90.0, 175.0), reference);
        }
    }

    #[test]
    fn test_recommend_goal_boundaries() {
        // 2.0 m keeps the arithmetic exact
        assert_eq!(recommend_goal(30, Sex::Male, 74.0, 200.0).goal, Goal::Maintain); // 18.5
        assert_eq!(recommend_goal(30, Sex::Male, 100.0, 200.0).goal, Goal::LoseWeight); // 25.0
        assert_eq!(recommend_goal(30, Sex::Male, 73.9, 200.0).goal, Goal::GainWeight);
    }
}
