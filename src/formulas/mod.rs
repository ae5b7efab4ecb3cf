//! Formula families
//!
//! One module per calculator. Each exposes plain numeric functions for the
//! published equations plus a `calculate_*` entry point that validates a
//! [`MeasurementInput`](crate::types::MeasurementInput) and returns a typed
//! result convertible into a [`FormulaResult`](crate::types::FormulaResult).

pub mod bmi;
pub mod bmr;
pub mod body_fat;
pub mod calorie_burn;
pub mod heart_rate;
pub mod ideal_weight;
pub mod macros;
pub mod risk;
pub mod vitamin_d;
pub mod water;

pub use bmi::{calculate_bmi, BmiResult};
pub use bmr::{calculate_bmr, BmrResult};
pub use body_fat::{calculate_body_fat, BodyFatResult};
pub use calorie_burn::{calculate_calorie_burn, CalorieBurnResult};
pub use heart_rate::{calculate_heart_rate_zones, HeartRateZone, HeartRateZones};
pub use ideal_weight::{calculate_ideal_weight, IdealWeightResult};
pub use macros::{calculate_macros, MacroResult};
pub use risk::{calculate_bone_density_risk, calculate_diabetes_risk, RiskScore};
pub use vitamin_d::{calculate_vitamin_d, VitaminDResult};
pub use water::{calculate_water_intake, WaterIntakeResult};

use crate::error::ComputeError;

/// Require an enumerated or otherwise unchecked field to be set
pub(crate) fn require<T: Copy>(value: Option<T>, field: &str) -> Result<T, ComputeError> {
    value.ok_or_else(|| ComputeError::missing(field))
}

/// Require a finite, strictly positive measurement
pub(crate) fn positive(value: Option<f64>, field: &str) -> Result<f64, ComputeError> {
    let v = require(value, field)?;
    check_positive(v, field)
}

/// Accept an absent measurement, but reject a present one that is not positive
pub(crate) fn optional_positive(
    value: Option<f64>,
    field: &str,
) -> Result<Option<f64>, ComputeError> {
    value.map(|v| check_positive(v, field)).transpose()
}

/// Absent means zero; present must be finite and non-negative
pub(crate) fn non_negative_or_zero(value: Option<f64>, field: &str) -> Result<f64, ComputeError> {
    match value {
        None => Ok(0.0),
        Some(v) if v.is_finite() && v >= 0.0 => Ok(v),
        Some(v) => Err(ComputeError::out_of_domain(
            field,
            format!("must be zero or positive, got {v}"),
        )),
    }
}

fn check_positive(v: f64, field: &str) -> Result<f64, ComputeError> {
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(ComputeError::out_of_domain(
            field,
            format!("must be positive, got {v}"),
        ))
    }
}

/// Reject a computed output that is not a finite, strictly positive number
///
/// Inputs pass `positive` individually, but extreme combinations can still
/// overflow or drive a linear formula below zero. `field` names the input
/// the caller should revisit.
pub(crate) fn positive_output(value: f64, field: &str, what: &str) -> Result<f64, ComputeError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ComputeError::out_of_domain(
            field,
            format!("measurements yield no usable {what} ({value})"),
        ))
    }
}

/// Round half away from zero to a number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(22.857, 1), 22.9);
        assert_eq!(round_to(1648.75, 0), 1649.0);
        assert_eq!(round_to(-1.25, 1), -1.3);
    }

    #[test]
    fn test_positive_rejects_zero_nan_and_missing() {
        assert!(matches!(
            positive(None, "weightKg"),
            Err(ComputeError::MissingField(f)) if f == "weightKg"
        ));
        assert!(positive(Some(0.0), "weightKg").is_err());
        assert!(positive(Some(-3.0), "weightKg").is_err());
        assert!(positive(Some(f64::NAN), "weightKg").is_err());
        assert!(positive(Some(f64::INFINITY), "weightKg").is_err());
        assert_eq!(positive(Some(70.0), "weightKg").unwrap(), 70.0);
    }

    #[test]
    fn test_optional_positive() {
        assert_eq!(optional_positive(None, "hipCm").unwrap(), None);
        assert_eq!(optional_positive(Some(90.0), "hipCm").unwrap(), Some(90.0));
        assert!(optional_positive(Some(0.0), "hipCm").is_err());
    }

    #[test]
    fn test_positive_output() {
        assert_eq!(positive_output(1648.75, "ageYears", "BMR").unwrap(), 1648.75);
        for bad in [0.0, -14.0, f64::INFINITY, f64::NAN] {
            let err = positive_output(bad, "ageYears", "BMR").unwrap_err();
            assert!(err.is_precondition());
        }
    }

    #[test]
    fn test_non_negative_or_zero() {
        assert_eq!(non_negative_or_zero(None, "exerciseHours").unwrap(), 0.0);
        assert_eq!(non_negative_or_zero(Some(0.0), "exerciseHours").unwrap(), 0.0);
        assert!(non_negative_or_zero(Some(-1.0), "exerciseHours").is_err());
    }
}
