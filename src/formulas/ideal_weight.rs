//! Ideal body weight
//!
//! Four linear formulas of the form `base + slope x (inches over 5 ft)`, plus
//! the weight band for BMI 18.5-24.9. None is authoritative; the result
//! carries all of them and their mean.

use serde::{Deserialize, Serialize};

use super::bmi::weight_for_bmi;
use super::{positive, positive_output, require, round_to};
use crate::error::ComputeError;
use crate::types::{FormulaId, FormulaResult, MeasurementInput, Sex};

const CM_PER_INCH: f64 = 2.54;
const FIVE_FEET_IN: f64 = 60.0;
const BAND_BMI_MIN: f64 = 18.5;
const BAND_BMI_MAX: f64 = 24.9;

/// (base kg, kg per inch) for male and female
struct LinearFormula {
    male: (f64, f64),
    female: (f64, f64),
}

impl LinearFormula {
    fn apply(&self, sex: Sex, inches_over: f64) -> f64 {
        let (base, slope) = match sex {
            Sex::Male => self.male,
            Sex::Female => self.female,
        };
        base + slope * inches_over
    }
}

/// Robinson (1983)
const ROBINSON: LinearFormula = LinearFormula {
    male: (52.0, 1.9),
    female: (49.0, 1.7),
};
/// Miller (1983)
const MILLER: LinearFormula = LinearFormula {
    male: (56.2, 1.41),
    female: (53.1, 1.36),
};
/// Devine (1974)
const DEVINE: LinearFormula = LinearFormula {
    male: (50.0, 2.3),
    female: (45.5, 2.3),
};
/// Hamwi (1964)
const HAMWI: LinearFormula = LinearFormula {
    male: (48.0, 2.7),
    female: (45.5, 2.2),
};

/// All weights in kg, one decimal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdealWeightResult {
    pub robinson: f64,
    pub miller: f64,
    pub devine: f64,
    pub hamwi: f64,
    pub healthy_bmi_min_kg: f64,
    pub healthy_bmi_max_kg: f64,
    /// Mean of the four formulas and the midpoint of the BMI band
    pub mean: f64,
}

pub fn inches_over_five_feet(height_cm: f64) -> f64 {
    height_cm / CM_PER_INCH - FIVE_FEET_IN
}

pub fn calculate_ideal_weight(input: &MeasurementInput) -> Result<IdealWeightResult, ComputeError> {
    let height = positive(input.height_cm, "heightCm")?;
    let sex = require(input.sex, "sex")?;

    let over = inches_over_five_feet(height);
    // Far below five feet the linear formulas cross zero
    let estimate = |value: f64| positive_output(value, "heightCm", "ideal weight");
    let robinson = estimate(ROBINSON.apply(sex, over))?;
    let miller = estimate(MILLER.apply(sex, over))?;
    let devine = estimate(DEVINE.apply(sex, over))?;
    let hamwi = estimate(HAMWI.apply(sex, over))?;
    let band_min = estimate(weight_for_bmi(BAND_BMI_MIN, height))?;
    let band_max = estimate(weight_for_bmi(BAND_BMI_MAX, height))?;

    let estimates = [robinson, miller, devine, hamwi, (band_min + band_max) / 2.0];
    let mean = estimates.iter().sum::<f64>() / estimates.len() as f64;

    Ok(IdealWeightResult {
        robinson: round_to(robinson, 1),
        miller: round_to(miller, 1),
        devine: round_to(devine, 1),
        hamwi: round_to(hamwi, 1),
        healthy_bmi_min_kg: round_to(band_min, 1),
        healthy_bmi_max_kg: round_to(band_max, 1),
        mean: round_to(mean, 1),
    })
}

impl From<IdealWeightResult> for FormulaResult {
    fn from(r: IdealWeightResult) -> Self {
        FormulaResult::new(FormulaId::IdealWeight)
            .with_value("robinson", r.robinson)
            .with_value("miller", r.miller)
            .with_value("devine", r.devine)
            .with_value("hamwi", r.hamwi)
            .with_value("healthyBmiMinKg", r.healthy_bmi_min_kg)
            .with_value("healthyBmiMaxKg", r.healthy_bmi_max_kg)
            .with_value("mean", r.mean)
    }
}
