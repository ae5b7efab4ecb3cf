//! Heart-rate training zones
//!
//! - Karvonen: bounds sit on the heart-rate reserve,
//!   `resting + (max - resting) x fraction`
//! - Standard (220 - age) and Tanaka (208 - 0.7 age): bounds are straight
//!   percentages of max heart rate
//!
//! Zone 5 always tops out at max heart rate.

use serde::{Deserialize, Serialize};

use super::positive;
use crate::error::ComputeError;
use crate::types::{FitnessLevel, FormulaId, FormulaResult, HeartRateMethod, MeasurementInput, Sex};

/// Lower and upper fraction for zones 1 through 5
pub const ZONE_FRACTIONS: [(f64, f64); 5] = [
    (0.50, 0.60),
    (0.60, 0.70),
    (0.70, 0.80),
    (0.80, 0.90),
    (0.90, 1.00),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartRateZone {
    pub zone: u8,
    pub min_bpm: u32,
    pub max_bpm: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateZones {
    pub method: HeartRateMethod,
    pub max_heart_rate: u32,
    /// Karvonen only
    pub heart_rate_reserve: Option<u32>,
    pub zones: Vec<HeartRateZone>,
}

impl HeartRateZones {
    /// Zone (1-5) containing a heart rate, `None` below zone 1 or above max
    pub fn zone_for(&self, bpm: u32) -> Option<u8> {
        self.zones
            .iter()
            .rev()
            .find(|z| bpm >= z.min_bpm && bpm <= z.max_bpm)
            .map(|z| z.zone)
    }
}

/// Estimated max heart rate for a method
///
/// Sex and fitness adjustments apply to the Karvonen estimate only.
pub fn max_heart_rate(
    method: HeartRateMethod,
    age: f64,
    sex: Option<Sex>,
    fitness: FitnessLevel,
) -> f64 {
    match method {
        HeartRateMethod::Karvonen => {
            let base = match sex {
                Some(Sex::Female) => 226.0,
                _ => 220.0,
            };
            let adjustment = match fitness {
                FitnessLevel::Beginner => -5.0,
                FitnessLevel::Average => 0.0,
                FitnessLevel::Athletic => 5.0,
            };
            base - age + adjustment
        }
        HeartRateMethod::Standard => 220.0 - age,
        HeartRateMethod::Tanaka => 208.0 - 0.7 * age,
    }
}

fn bpm(value: f64) -> u32 {
    value.round().max(0.0) as u32
}

/// Reserve-based zones
pub fn karvonen_zones(max_hr: f64, resting_hr: f64) -> Vec<HeartRateZone> {
    let reserve = max_hr - resting_hr;
    build_zones(max_hr, |fraction| resting_hr + reserve * fraction)
}

/// Percent-of-max zones
pub fn percent_of_max_zones(max_hr: f64) -> Vec<HeartRateZone> {
    build_zones(max_hr, |fraction| max_hr * fraction)
}

fn build_zones(max_hr: f64, bound: impl Fn(f64) -> f64) -> Vec<HeartRateZone> {
    let last = ZONE_FRACTIONS.len() - 1;
    ZONE_FRACTIONS
        .iter()
        .enumerate()
        .map(|(i, &(low, high))| HeartRateZone {
            zone: (i + 1) as u8,
            min_bpm: bpm(bound(low)),
            max_bpm: if i == last { bpm(max_hr) } else { bpm(bound(high)) },
        })
        .collect()
}

pub fn calculate_heart_rate_zones(input: &MeasurementInput) -> Result<HeartRateZones, ComputeError> {
    let age = positive(input.age_years, "ageYears")?;
    let method = input.heart_rate_method.unwrap_or_default();
    let fitness = input.fitness_level.unwrap_or_default();

    let max_hr = max_heart_rate(method, age, input.sex, fitness);
    if max_hr <= 0.0 {
        return Err(ComputeError::out_of_domain(
            "ageYears",
            "age leaves no positive max heart rate",
        ));
    }

    match method {
        HeartRateMethod::Karvonen => {
            let resting = positive(input.resting_heart_rate, "restingHeartRate")?;
            if resting >= max_hr {
                return Err(ComputeError::out_of_domain(
                    "restingHeartRate",
                    format!("must be below max heart rate {}", bpm(max_hr)),
                ));
            }
            Ok(HeartRateZones {
                method,
                max_heart_rate: bpm(max_hr),
                heart_rate_reserve: Some(bpm(max_hr - resting)),
                zones: karvonen_zones(max_hr, resting),
            })
        }
        HeartRateMethod::Standard | HeartRateMethod::Tanaka => Ok(HeartRateZones {
            method,
            max_heart_rate: bpm(max_hr),
            heart_rate_reserve: None,
            zones: percent_of_max_zones(max_hr),
        }),
    }
}

impl From<HeartRateZones> for FormulaResult {
    fn from(r: HeartRateZones) -> Self {
        let mut result = FormulaResult::new(FormulaId::HeartRateZones)
            .with_value("maxHeartRate", f64::from(r.max_heart_rate))
            .with_optional("heartRateReserve", r.heart_rate_reserve.map(f64::from))
            .with_classification(r.method.as_str());
        for zone in &r.zones {
            result = result
                .with_value(&format!("zone{}Min", zone.zone), f64::from(zone.min_bpm))
                .with_value(&format!("zone{}Max", zone.zone), f64::from(zone.max_bpm));
        }
        result
    }
}
