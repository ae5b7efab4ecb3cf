//! Daily vitamin D requirement
//!
//! Age-based RDA scaled by sun exposure, skin tone and obesity. The
//! multipliers are fixed lookup constants.

use serde::{Deserialize, Serialize};

use super::bmi::bmi;
use super::{optional_positive, positive, round_to};
use crate::error::ComputeError;
use crate::types::{FormulaId, FormulaResult, MeasurementInput, SkinTone, SunExposure};

const IU_PER_MICROGRAM: f64 = 40.0;
const ROUNDING_STEP_IU: f64 = 50.0;
const OBESITY_BMI: f64 = 30.0;
const OBESITY_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitaminDResult {
    /// Age-based recommended allowance (IU/day)
    pub base_iu: f64,
    /// Adjusted requirement, nearest 50 IU
    pub iu_per_day: f64,
    pub micrograms_per_day: f64,
}

/// RDA by age (IU/day)
pub fn base_requirement_iu(age: f64) -> f64 {
    if age < 1.0 {
        400.0
    } else if age <= 70.0 {
        600.0
    } else {
        800.0
    }
}

fn sun_multiplier(exposure: SunExposure) -> f64 {
    match exposure {
        SunExposure::Adequate => 1.0,
        SunExposure::Limited => 1.25,
        SunExposure::Minimal => 1.5,
    }
}

fn skin_multiplier(tone: SkinTone) -> f64 {
    match tone {
        SkinTone::Light => 1.0,
        SkinTone::Medium => 1.1,
        SkinTone::Dark => 1.25,
    }
}

pub fn calculate_vitamin_d(input: &MeasurementInput) -> Result<VitaminDResult, ComputeError> {
    let age = positive(input.age_years, "ageYears")?;
    let weight = optional_positive(input.weight_kg, "weightKg")?;
    let height = optional_positive(input.height_cm, "heightCm")?;

    let base = base_requirement_iu(age);
    let obese = weight
        .zip(height)
        .is_some_and(|(w, h)| bmi(w, h) >= OBESITY_BMI);

    let mut iu = base
        * sun_multiplier(input.sun_exposure.unwrap_or_default())
        * skin_multiplier(input.skin_tone.unwrap_or_default());
    if obese {
        iu *= OBESITY_MULTIPLIER;
    }
    let iu = (iu / ROUNDING_STEP_IU).round() * ROUNDING_STEP_IU;

    Ok(VitaminDResult {
        base_iu: base,
        iu_per_day: iu,
        micrograms_per_day: round_to(iu / IU_PER_MICROGRAM, 1),
    })
}

impl From<VitaminDResult> for FormulaResult {
    fn from(r: VitaminDResult) -> Self {
        FormulaResult::new(FormulaId::VitaminD)
            .with_value("baseIu", r.base_iu)
            .with_value("iuPerDay", r.iu_per_day)
            .with_value("microgramsPerDay", r.micrograms_per_day)
    }
}
