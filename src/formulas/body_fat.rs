//! Body fat percentage (US Navy circumference method)
//!
//! Male:   495 / (1.0324 - 0.19077 log10(waist - neck) + 0.15456 log10(height)) - 450
//! Female: 495 / (1.29579 - 0.35004 log10(waist + hip - neck) + 0.22100 log10(height)) - 450
//!
//! The logarithm argument must be positive, so the formula refuses to run
//! when the circumferences do not allow it.

use serde::{Deserialize, Serialize};

use super::{optional_positive, positive, require, round_to};
use crate::classification::body_fat_table;
use crate::error::ComputeError;
use crate::types::{FormulaId, FormulaResult, MeasurementInput, Sex};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyFatResult {
    /// Percent, one decimal
    pub body_fat_percent: f64,
    pub classification: String,
    /// Only when weight was supplied (kg, one decimal)
    pub fat_mass_kg: Option<f64>,
    pub lean_mass_kg: Option<f64>,
}

/// Navy estimate for men; `None` when waist does not exceed neck
pub fn navy_male(height_cm: f64, neck_cm: f64, waist_cm: f64) -> Option<f64> {
    let girth = waist_cm - neck_cm;
    if girth <= 0.0 {
        return None;
    }
    Some(495.0 / (1.0324 - 0.19077 * girth.log10() + 0.15456 * height_cm.log10()) - 450.0)
}

/// Navy estimate for women; `None` when waist + hip does not exceed neck
pub fn navy_female(height_cm: f64, neck_cm: f64, waist_cm: f64, hip_cm: f64) -> Option<f64> {
    let girth = waist_cm + hip_cm - neck_cm;
    if girth <= 0.0 {
        return None;
    }
    Some(495.0 / (1.29579 - 0.35004 * girth.log10() + 0.22100 * height_cm.log10()) - 450.0)
}

pub fn calculate_body_fat(input: &MeasurementInput) -> Result<BodyFatResult, ComputeError> {
    let sex = require(input.sex, "sex")?;
    let height = positive(input.height_cm, "heightCm")?;
    let neck = positive(input.neck_cm, "neckCm")?;
    let waist = positive(input.waist_cm, "waistCm")?;
    let weight = optional_positive(input.weight_kg, "weightKg")?;

    let estimate = match sex {
        Sex::Male => navy_male(height, neck, waist).ok_or_else(|| {
            ComputeError::out_of_domain("waistCm", "waist must exceed neck circumference")
        })?,
        Sex::Female => {
            let hip = positive(input.hip_cm, "hipCm")?;
            navy_female(height, neck, waist, hip).ok_or_else(|| {
                ComputeError::out_of_domain("waistCm", "waist + hip must exceed neck circumference")
            })?
        }
    };

    // Extreme but technically valid girths can push the estimate below zero
    if !estimate.is_finite() || estimate <= 0.0 {
        return Err(ComputeError::out_of_domain(
            "waistCm",
            "circumferences yield no physiological estimate",
        ));
    }

    let percent = round_to(estimate, 1);
    let fat_mass = weight.map(|w| w * estimate / 100.0);

    Ok(BodyFatResult {
        body_fat_percent: percent,
        classification: body_fat_table(sex).classify(percent).to_string(),
        fat_mass_kg: fat_mass.map(|f| round_to(f, 1)),
        lean_mass_kg: weight
            .zip(fat_mass)
            .map(|(w, f)| round_to(w - f, 1)),
    })
}

impl From<BodyFatResult> for FormulaResult {
    fn from(r: BodyFatResult) -> Self {
        FormulaResult::new(FormulaId::BodyFat)
            .with_value("bodyFatPercent", r.body_fat_percent)
            .with_optional("fatMassKg", r.fat_mass_kg)
            .with_optional("leanMassKg", r.lean_mass_kg)
            .with_classification(r.classification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn male() -> MeasurementInput {
        MeasurementInput {
            sex: Some(Sex::Male),
            height_cm: Some(178.0),
            neck_cm: Some(38.0),
            waist_cm: Some(85.0),
            ..Default::default()
        }
    }

    fn female() -> MeasurementInput {
        MeasurementInput {
            sex: Some(Sex::Female),
            height_cm: Some(165.0),
            neck_cm: Some(33.0),
            waist_cm: Some(75.0),
            hip_cm: Some(100.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_male_estimate() {
        let result = calculate_body_fat(&male()).unwrap();
        assert_eq!(
            result,
            BodyFatResult {
                body_fat_percent: 16.4,
                classification: "healthy".to_string(),
                fat_mass_kg: None,
                lean_mass_kg: None,
            }
        );
    }

    #[test]
    fn test_female_estimate() {
        let result = calculate_body_fat(&female()).unwrap();
        assert_eq!(result.body_fat_percent, 29.4);
        assert_eq!(result.classification, "acceptable");
    }

    #[test]
    fn test_mass_split_with_weight() {
        let mut input = male();
        input.weight_kg = Some(80.0);
        let result = calculate_body_fat(&input).unwrap();
        assert_eq!(result.fat_mass_kg, Some(13.1));
        assert_eq!(result.lean_mass_kg, Some(66.9));
    }

    #[test]
    fn test_waist_not_exceeding_neck_is_rejected() {
        for waist in [38.0, 30.0] {
            let mut input = male();
            input.waist_cm = Some(waist);
            let err = calculate_body_fat(&input).unwrap_err();
            assert!(err.is_precondition());
            assert!(matches!(err, ComputeError::OutOfDomain { ref field, .. } if field == "waistCm"));
        }
        assert_eq!(navy_male(178.0, 38.0, 38.0), None);
    }

    #[test]
    fn test_female_requires_hip() {
        let mut input = female();
        input.hip_cm = None;
        assert!(matches!(
            calculate_body_fat(&input),
            Err(ComputeError::MissingField(f)) if f == "hipCm"
        ));
    }

    #[test]
    fn test_non_positive_circumference_is_rejected() {
        let mut input = male();
        input.neck_cm = Some(0.0);
        assert!(calculate_body_fat(&input).is_err());
    }

    #[test]
    fn test_negative_estimate_is_rejected() {
        let mut input = male();
        input.waist_cm = Some(39.0);
        assert!(calculate_body_fat(&input).is_err());
    }
}
