//! Macronutrient split
//!
//! Harris-Benedict BMR -> TDEE -> goal-adjusted target calories -> fixed
//! percentage split -> grams by energy density.

use serde::{Deserialize, Serialize};

use super::bmr::harris_benedict;
use super::{positive, positive_output, require};
use crate::config::EvaluatorConfig;
use crate::error::ComputeError;
use crate::types::{FormulaId, FormulaResult, Goal, MeasurementInput};

/// kcal per gram of protein
pub const PROTEIN_KCAL_PER_G: f64 = 4.0;
/// kcal per gram of carbohydrate
pub const CARB_KCAL_PER_G: f64 = 4.0;
/// kcal per gram of fat
pub const FAT_KCAL_PER_G: f64 = 9.0;

/// Energy values in kcal/day, masses in grams/day, all rounded to integers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroResult {
    pub bmr: f64,
    pub tdee: f64,
    pub target_calories: f64,
    pub protein_grams: f64,
    pub fat_grams: f64,
    pub carb_grams: f64,
    pub goal: Goal,
}

pub fn calculate_macros(
    input: &MeasurementInput,
    config: &EvaluatorConfig,
) -> Result<MacroResult, ComputeError> {
    let weight = positive(input.weight_kg, "weightKg")?;
    let height = positive(input.height_cm, "heightCm")?;
    let age = positive(input.age_years, "ageYears")?;
    let sex = require(input.sex, "sex")?;
    let activity = require(input.activity_level, "activityLevel")?;
    let goal = require(input.goal, "goal")?;

    let bmr = positive_output(harris_benedict(weight, height, age, sex), "ageYears", "BMR")?;
    let tdee = bmr * config.activity_factors.factor(activity);
    let tdee = positive_output(tdee, "weightKg", "TDEE")?;
    let target = tdee + config.goal_delta(goal);
    if target <= 0.0 {
        return Err(ComputeError::out_of_domain(
            "goal",
            "calorie target would not be positive",
        ));
    }

    let split = &config.macro_split;

    Ok(MacroResult {
        bmr: bmr.round(),
        tdee: tdee.round(),
        target_calories: target.round(),
        protein_grams: (target * split.protein / PROTEIN_KCAL_PER_G).round(),
        fat_grams: (target * split.fat / FAT_KCAL_PER_G).round(),
        carb_grams: (target * split.carbs / CARB_KCAL_PER_G).round(),
        goal,
    })
}

impl From<MacroResult> for FormulaResult {
    fn from(r: MacroResult) -> Self {
        let goal = match r.goal {
            Goal::Lose => "lose",
            Goal::Maintain => "maintain",
            Goal::Gain => "gain",
        };
        FormulaResult::new(FormulaId::Macros)
            .with_value("bmr", r.bmr)
            .with_value("tdee", r.tdee)
            .with_value("targetCalories", r.target_calories)
            .with_value("proteinGrams", r.protein_grams)
            .with_value("fatGrams", r.fat_grams)
            .with_value("carbGrams", r.carb_grams)
            .with_classification(goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ActivityLevel, Sex};

    fn input(goal: Goal) -> MeasurementInput {
        MeasurementInput {
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            age_years: Some(30.0),
            sex: Some(Sex::Male),
            activity_level: Some(ActivityLevel::Moderate),
            goal: Some(goal),
            ..Default::default()
        }
    }

    #[test]
    fn test_maintain_reference() {
        let result = calculate_macros(&input(Goal::Maintain), &EvaluatorConfig::default()).unwrap();
        assert_eq!(result.bmr, 1696.0);
        assert_eq!(result.tdee, 2628.0);
        assert_eq!(result.target_calories, 2628.0);
        assert_eq!(result.protein_grams, 164.0);
        assert_eq!(result.fat_grams, 88.0);
        assert_eq!(result.carb_grams, 296.0);
    }

    #[test]
    fn test_goal_shifts_target() {
        let config = EvaluatorConfig::default();
        let lose = calculate_macros(&input(Goal::Lose), &config).unwrap();
        let gain = calculate_macros(&input(Goal::Gain), &config).unwrap();
        assert_eq!(lose.target_calories, 2128.0);
        assert_eq!(gain.target_calories, 3128.0);
        assert_eq!(lose.tdee, gain.tdee);
    }

    #[test]
    fn test_energy_balances_within_rounding() {
        let config = EvaluatorConfig::default();
        for goal in [Goal::Lose, Goal::Maintain, Goal::Gain] {
            for activity in [
                ActivityLevel::Sedentary,
                ActivityLevel::Light,
                ActivityLevel::Moderate,
                ActivityLevel::Active,
                ActivityLevel::VeryActive,
            ] {
                for sex in [Sex::Male, Sex::Female] {
                    let mut i = input(goal);
                    i.activity_level = Some(activity);
                    i.sex = Some(sex);
                    let r = calculate_macros(&i, &config).unwrap();
                    let energy = r.protein_grams * PROTEIN_KCAL_PER_G
                        + r.fat_grams * FAT_KCAL_PER_G
                        + r.carb_grams * CARB_KCAL_PER_G;
                    // Each gram value is off by at most half a gram
                    assert!((energy - r.target_calories).abs() <= 9.0, "{r:?}");
                }
            }
        }
    }

    #[test]
    fn test_requires_goal() {
        let mut i = input(Goal::Maintain);
        i.goal = None;
        assert!(matches!(
            calculate_macros(&i, &EvaluatorConfig::default()),
            Err(ComputeError::MissingField(f)) if f == "goal"
        ));
    }

    #[test]
    fn test_unusable_energy_is_rejected() {
        let mut i = input(Goal::Maintain);
        i.weight_kg = Some(f64::MAX);
        assert!(calculate_macros(&i, &EvaluatorConfig::default()).is_err());

        let mut config = EvaluatorConfig::default();
        config.goal_adjustment_kcal = 5000.0;
        let err = calculate_macros(&input(Goal::Lose), &config).unwrap_err();
        assert!(matches!(err, ComputeError::OutOfDomain { ref field, .. } if field == "goal"));
    }

    #[test]
    fn test_custom_split() {
        let mut config = EvaluatorConfig::default();
        config.macro_split.protein = 0.30;
        config.macro_split.carbs = 0.40;
        let result = calculate_macros(&input(Goal::Maintain), &config).unwrap();
        assert_eq!(result.protein_grams, 197.0);
    }
}
