//! MET-based calorie burn
//!
//! `calories = MET x weight(kg) x hours`. MET values follow the Compendium
//! of Physical Activities (Ainsworth et al., 2011).

use serde::{Deserialize, Serialize};

use super::{positive, positive_output, require, round_to};
use crate::error::ComputeError;
use crate::types::{FormulaId, FormulaResult, Intensity, MeasurementInput};

/// kcal of energy per gram of body fat used for the fat-mass equivalent
const KCAL_PER_FAT_GRAM: f64 = 9.0;

/// MET by activity, as (light, moderate, vigorous)
pub const MET_TABLE: &[(&str, [f64; 3])] = &[
    ("walking", [2.8, 3.5, 5.0]),
    ("running", [6.0, 9.8, 11.5]),
    ("cycling", [4.0, 6.8, 10.0]),
    ("swimming", [5.8, 7.0, 9.8]),
    ("hiking", [5.3, 6.0, 7.8]),
    ("yoga", [2.5, 3.0, 4.0]),
    ("weight_training", [3.5, 5.0, 6.0]),
    ("aerobics", [5.0, 6.5, 7.3]),
    ("dancing", [3.0, 4.8, 7.3]),
    ("rowing", [3.5, 7.0, 8.5]),
    ("elliptical", [4.6, 5.0, 7.0]),
    ("jump_rope", [8.8, 11.8, 12.3]),
    ("basketball", [4.5, 6.5, 8.0]),
    ("soccer", [5.0, 7.0, 10.0]),
    ("tennis", [5.0, 7.3, 8.0]),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieBurnResult {
    pub activity: String,
    pub met: f64,
    /// kcal, rounded to an integer
    pub calories: f64,
    /// Fat-mass equivalent (g, one decimal)
    pub fat_grams: f64,
}

fn normalize_activity(name: &str) -> String {
    name.trim()
        .to_ascii_lowercase()
        .replace([' ', '-'], "_")
}

/// MET for an activity and intensity, `None` for unknown activities
pub fn met_value(activity: &str, intensity: Intensity) -> Option<f64> {
    let key = normalize_activity(activity);
    MET_TABLE
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, mets)| match intensity {
            Intensity::Light => mets[0],
            Intensity::Moderate => mets[1],
            Intensity::Vigorous => mets[2],
        })
}

pub fn calculate_calorie_burn(input: &MeasurementInput) -> Result<CalorieBurnResult, ComputeError> {
    let weight = positive(input.weight_kg, "weightKg")?;
    let activity = input
        .activity
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .ok_or_else(|| ComputeError::missing("activity"))?;
    let intensity = require(input.intensity, "intensity")?;
    let minutes = positive(input.duration_minutes, "durationMinutes")?;

    let met = met_value(activity, intensity)
        .ok_or_else(|| ComputeError::UnknownActivity(activity.to_string()))?;
    let calories = positive_output(
        met * weight * (minutes / 60.0),
        "durationMinutes",
        "calorie burn",
    )?;

    Ok(CalorieBurnResult {
        activity: normalize_activity(activity),
        met,
        calories: calories.round(),
        fat_grams: round_to(calories / KCAL_PER_FAT_GRAM, 1),
    })
}

impl From<CalorieBurnResult> for FormulaResult {
    fn from(r: CalorieBurnResult) -> Self {
        FormulaResult::new(FormulaId::CalorieBurn)
            .with_value("met", r.met)
            .with_value("calories", r.calories)
            .with_value("fatGrams", r.fat_grams)
            .with_classification(r.activity)
    }
}
