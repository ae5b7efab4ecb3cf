//! Core types for vitalcalc
//!
//! This module defines the data structures that flow through an evaluation:
//! the measurement record submitted by a caller, the categorical fields it
//! carries, and the result record handed back for rendering.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ComputeError;

/// Biological sex, used for sex-specific coefficients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

/// Habitual activity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    Light,
    /// Moderate exercise 3-5 days/week
    Moderate,
    /// Hard exercise 6-7 days/week
    Active,
    /// Very hard exercise or physical job
    VeryActive,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }
}

/// Body-weight goal for the macro split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

/// Method used to derive heart-rate zones
///
/// Karvonen bounds are reserve-based; the other two are straight
/// percentages of max heart rate. The two families are not interchangeable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeartRateMethod {
    #[default]
    Karvonen,
    /// 220 - age
    Standard,
    /// 208 - 0.7 x age
    Tanaka,
}

impl HeartRateMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeartRateMethod::Karvonen => "karvonen",
            HeartRateMethod::Standard => "standard",
            HeartRateMethod::Tanaka => "tanaka",
        }
    }
}

/// Self-reported fitness level, shifts the Karvonen max heart rate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitnessLevel {
    Beginner,
    #[default]
    Average,
    Athletic,
}

/// Climate category for hydration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Climate {
    Cold,
    #[default]
    Temperate,
    Hot,
    HotHumid,
}

/// Exercise intensity for MET lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Light,
    Moderate,
    Vigorous,
}

/// Typical daily sun exposure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SunExposure {
    #[default]
    Adequate,
    Limited,
    Minimal,
}

/// Skin tone, affects cutaneous vitamin D synthesis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkinTone {
    #[default]
    Light,
    Medium,
    Dark,
}

/// Risk band produced by the point-score calculators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
        }
    }
}

/// A single user submission
///
/// Every field is optional; each formula states which ones it needs and
/// refuses to run until they are present and within domain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeasurementInput {
    /// Body weight (kg)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    /// Height (cm)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    /// Age (years)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_years: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    /// Resting heart rate (bpm)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resting_heart_rate: Option<f64>,
    /// Neck circumference (cm)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neck_cm: Option<f64>,
    /// Waist circumference (cm)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waist_cm: Option<f64>,
    /// Hip circumference (cm)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hip_cm: Option<f64>,
    /// Known body fat (percent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_fat_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<ActivityLevel>,

    // Heart rate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart_rate_method: Option<HeartRateMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fitness_level: Option<FitnessLevel>,

    // Hydration
    /// Daily exercise (hours)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub climate: Option<Climate>,
    pub pregnant: bool,
    pub breastfeeding: bool,
    pub ill: bool,

    // Macros
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<Goal>,

    // Calorie burn
    /// MET table key, e.g. "running"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<Intensity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,

    // Risk factors
    /// Age at menopause (years), if applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menopause_age: Option<f64>,
    pub family_history: bool,
    pub smoker: bool,
    pub heavy_alcohol: bool,
    pub physically_active: bool,
    pub low_calcium_intake: bool,
    pub low_vitamin_d_intake: bool,
    pub hypertension: bool,
    pub gestational_diabetes: bool,

    // Vitamin D
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sun_exposure: Option<SunExposure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skin_tone: Option<SkinTone>,
}

impl MeasurementInput {
    /// Parse a measurement record from JSON
    pub fn from_json(json: &str) -> Result<Self, ComputeError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Identifier of a formula family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormulaId {
    Bmi,
    Bmr,
    BodyFat,
    HeartRateZones,
    WaterIntake,
    Macros,
    IdealWeight,
    CalorieBurn,
    BoneDensityRisk,
    DiabetesRisk,
    VitaminD,
}

impl FormulaId {
    /// Every formula, in presentation order
    pub const ALL: [FormulaId; 11] = [
        FormulaId::Bmi,
        FormulaId::Bmr,
        FormulaId::BodyFat,
        FormulaId::HeartRateZones,
        FormulaId::WaterIntake,
        FormulaId::Macros,
        FormulaId::IdealWeight,
        FormulaId::CalorieBurn,
        FormulaId::BoneDensityRisk,
        FormulaId::DiabetesRisk,
        FormulaId::VitaminD,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormulaId::Bmi => "bmi",
            FormulaId::Bmr => "bmr",
            FormulaId::BodyFat => "body_fat",
            FormulaId::HeartRateZones => "heart_rate_zones",
            FormulaId::WaterIntake => "water_intake",
            FormulaId::Macros => "macros",
            FormulaId::IdealWeight => "ideal_weight",
            FormulaId::CalorieBurn => "calorie_burn",
            FormulaId::BoneDensityRisk => "bone_density_risk",
            FormulaId::DiabetesRisk => "diabetes_risk",
            FormulaId::VitaminD => "vitamin_d",
        }
    }

    /// Fields that must be present before the formula can run
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            FormulaId::Bmi => &["weightKg", "heightCm"],
            FormulaId::Bmr => &["weightKg", "heightCm", "ageYears", "sex", "activityLevel"],
            FormulaId::BodyFat => &["sex", "heightCm", "neckCm", "waistCm", "hipCm (female)"],
            FormulaId::HeartRateZones => &["ageYears", "restingHeartRate (karvonen)"],
            FormulaId::WaterIntake => &["weightKg", "ageYears", "sex", "activityLevel"],
            FormulaId::Macros => &[
                "weightKg",
                "heightCm",
                "ageYears",
                "sex",
                "activityLevel",
                "goal",
            ],
            FormulaId::IdealWeight => &["heightCm", "sex"],
            FormulaId::CalorieBurn => &["weightKg", "activity", "intensity", "durationMinutes"],
            FormulaId::BoneDensityRisk => &["ageYears", "sex", "weightKg", "heightCm"],
            FormulaId::DiabetesRisk => &["ageYears", "sex", "weightKg", "heightCm"],
            FormulaId::VitaminD => &["ageYears"],
        }
    }
}

impl fmt::Display for FormulaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormulaId {
    type Err = ComputeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        FormulaId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == normalized)
            .ok_or_else(|| ComputeError::UnknownFormula(s.to_string()))
    }
}

/// Output of a single evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormulaResult {
    pub formula: FormulaId,
    /// Named numeric outputs, keyed in camelCase
    pub values: BTreeMap<String, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
}

impl FormulaResult {
    pub fn new(formula: FormulaId) -> Self {
        Self {
            formula,
            values: BTreeMap::new(),
            classification: None,
            recommendations: Vec::new(),
        }
    }

    pub fn with_value(mut self, name: &str, value: f64) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }

    pub fn with_optional(self, name: &str, value: Option<f64>) -> Self {
        match value {
            Some(v) => self.with_value(name, v),
            None => self,
        }
    }

    pub fn with_classification(mut self, label: impl Into<String>) -> Self {
        self.classification = Some(label.into());
        self
    }

    pub fn with_recommendations(mut self, recommendations: Vec<String>) -> Self {
        self.recommendations = recommendations;
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }
}
