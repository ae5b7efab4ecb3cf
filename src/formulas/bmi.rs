//! Body Mass Index

use serde::{Deserialize, Serialize};

use super::{positive, positive_output, round_to};
use crate::classification::BMI;
use crate::error::ComputeError;
use crate::types::{FormulaId, FormulaResult, MeasurementInput};

/// Lower bound of the normal BMI band
pub const HEALTHY_BMI_MIN: f64 = 18.5;
/// Upper bound of the normal BMI band
pub const HEALTHY_BMI_MAX: f64 = 24.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    /// BMI, one decimal
    pub bmi: f64,
    pub classification: String,
    /// Weight at the bottom of the normal band for this height (kg)
    pub healthy_weight_min_kg: f64,
    /// Weight at the top of the normal band for this height (kg)
    pub healthy_weight_max_kg: f64,
}

/// Unrounded BMI: weight / height(m)^2
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Weight (kg) that yields the given BMI at the given height
pub fn weight_for_bmi(target_bmi: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    target_bmi * height_m * height_m
}

pub fn calculate_bmi(input: &MeasurementInput) -> Result<BmiResult, ComputeError> {
    let weight = positive(input.weight_kg, "weightKg")?;
    let height = positive(input.height_cm, "heightCm")?;

    let value = positive_output(round_to(bmi(weight, height), 1), "weightKg", "BMI")?;
    let band = |target| {
        positive_output(
            round_to(weight_for_bmi(target, height), 1),
            "heightCm",
            "weight band",
        )
    };

    Ok(BmiResult {
        bmi: value,
        classification: BMI.classify(value).to_string(),
        healthy_weight_min_kg: band(HEALTHY_BMI_MIN)?,
        healthy_weight_max_kg: band(HEALTHY_BMI_MAX)?,
    })
}

impl From<BmiResult> for FormulaResult {
    fn from(r: BmiResult) -> Self {
        FormulaResult::new(FormulaId::Bmi)
            .with_value("bmi", r.bmi)
            .with_value("healthyWeightMinKg", r.healthy_weight_min_kg)
            .with_value("healthyWeightMaxKg", r.healthy_weight_max_kg)
            .with_classification(r.classification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(weight: f64, height: f64) -> MeasurementInput {
        MeasurementInput {
            weight_kg: Some(weight),
            height_cm: Some(height),
            ..Default::default()
        }
    }

    #[test]
    fn test_reference_value() {
        let result = calculate_bmi(&input(70.0, 175.0)).unwrap();
        assert_eq!(result.bmi, 22.9);
        assert_eq!(result.classification, "normal");
        assert_eq!(result.healthy_weight_min_kg, 56.7);
        assert_eq!(result.healthy_weight_max_kg, 73.5);
    }

    #[test]
    fn test_classification_bands() {
        assert_eq!(calculate_bmi(&input(50.0, 175.0)).unwrap().classification, "underweight");
        assert_eq!(calculate_bmi(&input(80.0, 175.0)).unwrap().classification, "overweight");
        assert_eq!(calculate_bmi(&input(95.0, 175.0)).unwrap().classification, "obese");
    }

    #[test]
    fn test_matches_formula_exactly() {
        for weight in [45.0, 62.5, 81.3, 120.0] {
            for height in [150.0, 168.0, 181.5, 200.0] {
                let height_m = height / 100.0;
                let expected = round_to(weight / (height_m * height_m), 1);
                assert_eq!(calculate_bmi(&input(weight, height)).unwrap().bmi, expected);
            }
        }
    }

    #[test]
    fn test_monotonic() {
        let mut previous = 0.0;
        for weight in (40..=150).step_by(5) {
            let value = bmi(weight as f64, 175.0);
            assert!(value > previous);
            previous = value;
        }

        let mut previous = f64::MAX;
        for height in (140..=210).step_by(5) {
            let value = bmi(70.0, height as f64);
            assert!(value < previous);
            previous = value;
        }
    }

    #[test]
    fn test_preconditions() {
        assert!(matches!(
            calculate_bmi(&MeasurementInput::default()),
            Err(ComputeError::MissingField(f)) if f == "weightKg"
        ));
        assert!(calculate_bmi(&input(70.0, 0.0)).is_err());
        assert!(calculate_bmi(&input(0.0, 175.0)).is_err());
        assert!(calculate_bmi(&input(-70.0, 175.0)).is_err());
    }

    #[test]
    fn test_overflowing_measurements_are_rejected() {
        let err = calculate_bmi(&input(1e308, 1e-3)).unwrap_err();
        assert!(matches!(err, ComputeError::OutOfDomain { ref field, .. } if field == "weightKg"));

        // Band weights round to zero for a sub-millimetre height
        assert!(calculate_bmi(&input(1e-9, 1e-3)).is_err());
        assert!(calculate_bmi(&input(70.0, 1e200)).is_err());
    }
}
