//! Basal Metabolic Rate and Total Daily Energy Expenditure
//!
//! Three independent estimators are computed side by side; none overrides
//! another. Their mean drives TDEE.
//!
//! # References
//!
//! - Mifflin, M.D., et al. (1990). A new predictive equation for resting energy
//!   expenditure. *Am J Clin Nutr*, 51(2), 241-247.
//! - Roza, A.M., & Shizgal, H.M. (1984). The Harris Benedict equation
//!   reevaluated. *Am J Clin Nutr*, 40(1), 168-182.
//! - Katch, F.I., & McArdle, W.D. (1996). *Nutrition, Weight Control and
//!   Exercise*.

use serde::{Deserialize, Serialize};

use super::{positive, positive_output, require, round_to};
use crate::config::ActivityFactors;
use crate::error::ComputeError;
use crate::types::{ActivityLevel, FormulaId, FormulaResult, MeasurementInput, Sex};

/// Body fat range (exclusive) in which Katch-McArdle is trusted
const KATCH_MCARDLE_BODY_FAT_RANGE: (f64, f64) = (0.0, 50.0);

/// All energy values in kcal/day, rounded to integers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmrResult {
    pub mifflin_st_jeor: f64,
    pub harris_benedict: f64,
    /// Present only when a usable body fat percentage was supplied
    pub katch_mcardle: Option<f64>,
    /// Lean body mass used by Katch-McArdle (kg, one decimal)
    pub lean_body_mass_kg: Option<f64>,
    /// Mean of the estimators that ran
    pub average: f64,
    pub tdee: f64,
    pub activity_level: ActivityLevel,
}

/// Mifflin-St Jeor: 10w + 6.25h - 5a + (5 | -161)
pub fn mifflin_st_jeor(weight_kg: f64, height_cm: f64, age: f64, sex: Sex) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age;
    match sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

/// Revised Harris-Benedict (Roza & Shizgal 1984)
pub fn harris_benedict(weight_kg: f64, height_cm: f64, age: f64, sex: Sex) -> f64 {
    match sex {
        Sex::Male => 88.362 + 13.397 * weight_kg + 4.799 * height_cm - 5.677 * age,
        Sex::Female => 447.593 + 9.247 * weight_kg + 3.098 * height_cm - 4.330 * age,
    }
}

/// Lean body mass (kg) from total weight and body fat percentage
pub fn lean_body_mass(weight_kg: f64, body_fat_percent: f64) -> f64 {
    weight_kg * (1.0 - body_fat_percent / 100.0)
}

/// Katch-McArdle: 370 + 21.6 x LBM
///
/// Returns `None` unless body fat lies strictly inside (0, 50).
pub fn katch_mcardle(weight_kg: f64, body_fat_percent: f64) -> Option<f64> {
    let (low, high) = KATCH_MCARDLE_BODY_FAT_RANGE;
    if body_fat_percent.is_finite() && body_fat_percent > low && body_fat_percent < high {
        Some(370.0 + 21.6 * lean_body_mass(weight_kg, body_fat_percent))
    } else {
        None
    }
}

pub fn calculate_bmr(
    input: &MeasurementInput,
    factors: &ActivityFactors,
) -> Result<BmrResult, ComputeError> {
    let weight = positive(input.weight_kg, "weightKg")?;
    let height = positive(input.height_cm, "heightCm")?;
    let age = positive(input.age_years, "ageYears")?;
    let sex = require(input.sex, "sex")?;
    let activity_level = require(input.activity_level, "activityLevel")?;

    // The age term is subtractive, so small bodies at high ages go negative
    let msj = positive_output(mifflin_st_jeor(weight, height, age, sex), "ageYears", "BMR")?;
    let hb = positive_output(harris_benedict(weight, height, age, sex), "ageYears", "BMR")?;
    let body_fat = input.body_fat_percent;
    let km = body_fat.and_then(|bf| katch_mcardle(weight, bf));

    let estimators: Vec<f64> = [Some(msj), Some(hb), km].into_iter().flatten().collect();
    let average = estimators.iter().sum::<f64>() / estimators.len() as f64;
    let tdee = positive_output(average * factors.factor(activity_level), "weightKg", "TDEE")?;

    Ok(BmrResult {
        mifflin_st_jeor: msj.round(),
        harris_benedict: hb.round(),
        katch_mcardle: km.map(f64::round),
        lean_body_mass_kg: km
            .and(body_fat)
            .map(|bf| round_to(lean_body_mass(weight, bf), 1)),
        average: average.round(),
        tdee: tdee.round(),
        activity_level,
    })
}

impl From<BmrResult> for FormulaResult {
    fn from(r: BmrResult) -> Self {
        FormulaResult::new(FormulaId::Bmr)
            .with_value("mifflinStJeor", r.mifflin_st_jeor)
            .with_value("harrisBenedict", r.harris_benedict)
            .with_optional("katchMcArdle", r.katch_mcardle)
            .with_optional("leanBodyMassKg", r.lean_body_mass_kg)
            .with_value("average", r.average)
            .with_value("tdee", r.tdee)
            .with_classification(r.activity_level.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn male_input() -> MeasurementInput {
        MeasurementInput {
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            age_years: Some(30.0),
            sex: Some(Sex::Male),
            activity_level: Some(ActivityLevel::Moderate),
            ..Default::default()
        }
    }

    #[test]
    fn test_mifflin_reference_value() {
        let raw = mifflin_st_jeor(70.0, 175.0, 30.0, Sex::Male);
        // 700 + 1093.75 - 150 + 5
        assert!((raw - 1648.75).abs() < 1e-9);

        let result = calculate_bmr(&male_input(), &ActivityFactors::default()).unwrap();
        assert_eq!(result.mifflin_st_jeor, 1649.0);
    }

    #[test]
    fn test_two_estimators_without_body_fat() {
        let result = calculate_bmr(&male_input(), &ActivityFactors::default()).unwrap();

        assert_eq!(result.harris_benedict, 1696.0);
        assert_eq!(result.katch_mcardle, None);
        assert_eq!(result.lean_body_mass_kg, None);
        // (1648.75 + 1695.667) / 2
        assert_eq!(result.average, 1672.0);
        // 1672.208 x 1.55
        assert_eq!(result.tdee, 2592.0);
    }

    #[test]
    fn test_katch_mcardle_joins_average() {
        let mut input = male_input();
        input.body_fat_percent = Some(15.0);
        let result = calculate_bmr(&input, &ActivityFactors::default()).unwrap();

        assert_eq!(result.lean_body_mass_kg, Some(59.5));
        assert_eq!(result.katch_mcardle, Some(1655.0));
        // (1648.75 + 1695.667 + 1655.2) / 3
        assert_eq!(result.average, 1667.0);
    }

    #[test]
    fn test_katch_mcardle_excluded_outside_range() {
        for bf in [0.0, 50.0, 65.0, -4.0] {
            let mut input = male_input();
            input.body_fat_percent = Some(bf);
            let result = calculate_bmr(&input, &ActivityFactors::default()).unwrap();
            assert_eq!(result.katch_mcardle, None);
            assert_eq!(result.average, 1672.0);
        }
    }

    #[test]
    fn test_female_coefficients() {
        let input = MeasurementInput {
            weight_kg: Some(60.0),
            height_cm: Some(165.0),
            age_years: Some(25.0),
            sex: Some(Sex::Female),
            activity_level: Some(ActivityLevel::Sedentary),
            ..Default::default()
        };
        let result = calculate_bmr(&input, &ActivityFactors::default()).unwrap();
        assert_eq!(result.mifflin_st_jeor, 1345.0);
        assert_eq!(result.harris_benedict, 1405.0);
    }

    #[test]
    fn test_activity_factor_scales_tdee() {
        let factors = ActivityFactors::default();
        let mut input = male_input();
        let mut previous = 0.0;
        for level in [
            ActivityLevel::Sedentary,
            ActivityLevel::Light,
            ActivityLevel::Moderate,
            ActivityLevel::Active,
            ActivityLevel::VeryActive,
        ] {
            input.activity_level = Some(level);
            let tdee = calculate_bmr(&input, &factors).unwrap().tdee;
            assert!(tdee > previous);
            previous = tdee;
        }
    }

    #[test]
    fn test_non_positive_estimate_is_rejected() {
        // Mifflin-St Jeor comes out at -268.5 kcal
        let input = MeasurementInput {
            weight_kg: Some(3.0),
            height_cm: Some(50.0),
            age_years: Some(90.0),
            sex: Some(Sex::Female),
            activity_level: Some(ActivityLevel::Sedentary),
            ..Default::default()
        };
        let err = calculate_bmr(&input, &ActivityFactors::default()).unwrap_err();
        assert!(matches!(err, ComputeError::OutOfDomain { ref field, .. } if field == "ageYears"));
    }

    #[test]
    fn test_overflowing_weight_is_rejected() {
        let mut input = male_input();
        input.weight_kg = Some(f64::MAX);
        assert!(calculate_bmr(&input, &ActivityFactors::default()).is_err());
    }

    #[test]
    fn test_requires_activity_level_and_sex() {
        let mut input = male_input();
        input.activity_level = None;
        assert!(matches!(
            calculate_bmr(&input, &ActivityFactors::default()),
            Err(ComputeError::MissingField(f)) if f == "activityLevel"
        ));

        let mut input = male_input();
        input.sex = None;
        assert!(matches!(
            calculate_bmr(&input, &ActivityFactors::default()),
            Err(ComputeError::MissingField(f)) if f == "sex"
        ));
    }
}
