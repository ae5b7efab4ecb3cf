//! Daily water intake
//!
//! `base = weight x 35 mL`, scaled by age, sex and activity multipliers, then
//! additive terms for exercise, climate, pregnancy, breastfeeding and illness.

use serde::{Deserialize, Serialize};

use super::{non_negative_or_zero, positive, positive_output, require, round_to};
use crate::config::WaterConfig;
use crate::error::ComputeError;
use crate::types::{Climate, FormulaId, FormulaResult, MeasurementInput, Sex};

const CUP_ML: f64 = 250.0;
const BOTTLE_ML: f64 = 500.0;
const PREGNANCY_ML: f64 = 300.0;
const BREASTFEEDING_ML: f64 = 700.0;
const ILLNESS_FRACTION: f64 = 0.15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterIntakeResult {
    /// Weight-based baseline before adjustments (mL)
    pub base_ml: f64,
    /// Recommended daily total (mL)
    pub total_ml: f64,
    pub cups: f64,
    pub bottles: f64,
    pub liters: f64,
}

fn age_multiplier(age: f64) -> f64 {
    if age > 65.0 {
        0.9
    } else if age < 18.0 {
        1.1
    } else {
        1.0
    }
}

fn sex_multiplier(sex: Sex) -> f64 {
    match sex {
        Sex::Male => 1.1,
        Sex::Female => 1.0,
    }
}

/// Climate adjustment as a fraction of the baseline
fn climate_fraction(climate: Climate) -> f64 {
    match climate {
        Climate::Cold => -0.10,
        Climate::Temperate => 0.0,
        Climate::Hot => 0.10,
        Climate::HotHumid => 0.20,
    }
}

pub fn calculate_water_intake(
    input: &MeasurementInput,
    config: &WaterConfig,
) -> Result<WaterIntakeResult, ComputeError> {
    let weight = positive(input.weight_kg, "weightKg")?;
    let age = positive(input.age_years, "ageYears")?;
    let sex = require(input.sex, "sex")?;
    let activity = require(input.activity_level, "activityLevel")?;
    let exercise_hours = non_negative_or_zero(input.exercise_hours, "exerciseHours")?;
    let climate = input.climate.unwrap_or_default();

    let base = weight * config.ml_per_kg;
    let scaled = base
        * age_multiplier(age)
        * sex_multiplier(sex)
        * config.activity_multipliers.factor(activity);

    let mut total = scaled
        + exercise_hours * config.exercise_ml_per_hour
        + base * climate_fraction(climate);
    if input.pregnant {
        total += PREGNANCY_ML;
    }
    if input.breastfeeding {
        total += BREASTFEEDING_ML;
    }
    if input.ill {
        total += base * ILLNESS_FRACTION;
    }

    let total_ml = positive_output(total, "weightKg", "water intake")?.round();

    Ok(WaterIntakeResult {
        base_ml: base.round(),
        total_ml,
        cups: (total_ml / CUP_ML).round(),
        bottles: (total_ml / BOTTLE_ML).round(),
        liters: round_to(total_ml / 1000.0, 1),
    })
}

impl From<WaterIntakeResult> for FormulaResult {
    fn from(r: WaterIntakeResult) -> Self {
        FormulaResult::new(FormulaId::WaterIntake)
            .with_value("baseMl", r.base_ml)
            .with_value("totalMl", r.total_ml)
            .with_value("cups", r.cups)
            .with_value("bottles", r.bottles)
            .with_value("liters", r.liters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActivityLevel;
    use pretty_assertions::assert_eq;

    fn input() -> MeasurementInput {
        MeasurementInput {
            weight_kg: Some(60.0),
            age_years: Some(30.0),
            sex: Some(Sex::Female),
            activity_level: Some(ActivityLevel::Light),
            ..Default::default()
        }
    }

    fn total(input: &MeasurementInput) -> f64 {
        calculate_water_intake(input, &WaterConfig::default())
            .unwrap()
            .total_ml
    }

    #[test]
    fn test_baseline() {
        let result = calculate_water_intake(&input(), &WaterConfig::default()).unwrap();
        assert_eq!(
            result,
            WaterIntakeResult {
                base_ml: 2100.0,
                total_ml: 2100.0,
                cups: 8.0,
                bottles: 4.0,
                liters: 2.1,
            }
        );
    }

    #[test]
    fn test_exercise_adds_per_hour() {
        let mut i = input();
        i.exercise_hours = Some(1.0);
        let result = calculate_water_intake(&i, &WaterConfig::default()).unwrap();
        assert_eq!(result.total_ml, 2725.0);
        assert_eq!(result.cups, 11.0);
        assert_eq!(result.bottles, 5.0);
    }

    #[test]
    fn test_age_bands() {
        let mut i = input();
        i.age_years = Some(70.0);
        assert_eq!(total(&i), 1890.0);
        i.age_years = Some(16.0);
        assert_eq!(total(&i), 2310.0);
    }

    #[test]
    fn test_additive_conditions() {
        let mut i = input();
        i.climate = Some(Climate::HotHumid);
        i.pregnant = true;
        i.ill = true;
        // 2100 + 420 + 300 + 315
        assert_eq!(total(&i), 3135.0);

        let mut i = input();
        i.breastfeeding = true;
        assert_eq!(total(&i), 2800.0);

        let mut i = input();
        i.climate = Some(Climate::Cold);
        assert_eq!(total(&i), 1890.0);
    }

    #[test]
    fn test_monotonic_in_weight_and_exercise() {
        for climate in [Climate::Cold, Climate::Temperate, Climate::HotHumid] {
            let mut i = input();
            i.climate = Some(climate);
            i.sex = Some(Sex::Male);
            i.activity_level = Some(ActivityLevel::Sedentary);

            let mut previous = 0.0;
            for weight in (30..=150).step_by(3) {
                i.weight_kg = Some(weight as f64);
                let t = total(&i);
                assert!(t >= previous);
                previous = t;
            }

            i.weight_kg = Some(70.0);
            let mut previous = 0.0;
            for quarter_hours in 0..=16 {
                i.exercise_hours = Some(quarter_hours as f64 / 4.0);
                let t = total(&i);
                assert!(t >= previous);
                previous = t;
            }
        }
    }

    #[test]
    fn test_preconditions() {
        let mut i = input();
        i.exercise_hours = Some(-1.0);
        assert!(calculate_water_intake(&i, &WaterConfig::default()).is_err());

        let mut i = input();
        i.weight_kg = Some(f64::MAX);
        assert!(calculate_water_intake(&i, &WaterConfig::default()).is_err());

        let mut i = input();
        i.activity_level = None;
        assert!(matches!(
            calculate_water_intake(&i, &WaterConfig::default()),
            Err(ComputeError::MissingField(f)) if f == "activityLevel"
        ));
    }
}
