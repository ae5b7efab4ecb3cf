//! Point-score risk calculators
//!
//! Each factor contributes a fixed number of points; the sum is banded into
//! low / moderate / high and paired with a fixed recommendation list. The
//! point values are lookup constants, not a validated clinical model.

use serde::{Deserialize, Serialize};

use super::bmi::bmi;
use super::{positive, require};
use crate::error::ComputeError;
use crate::types::{FormulaId, FormulaResult, MeasurementInput, RiskLevel, Sex};

/// A factor that contributed points to a score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub name: String,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    pub formula: FormulaId,
    pub score: u32,
    pub level: RiskLevel,
    /// Only factors with non-zero points, in evaluation order
    pub factors: Vec<RiskFactor>,
    pub recommendations: Vec<String>,
}

/// Score cut-offs: scores up to `low_max` are low, up to `moderate_max` moderate
struct Bands {
    low_max: u32,
    moderate_max: u32,
}

impl Bands {
    fn level(&self, score: u32) -> RiskLevel {
        if score <= self.low_max {
            RiskLevel::Low
        } else if score <= self.moderate_max {
            RiskLevel::Moderate
        } else {
            RiskLevel::High
        }
    }
}

#[derive(Default)]
struct Tally {
    factors: Vec<RiskFactor>,
}

impl Tally {
    fn add(&mut self, name: &str, points: u32) {
        if points > 0 {
            self.factors.push(RiskFactor {
                name: name.to_string(),
                points,
            });
        }
    }

    fn flag(&mut self, name: &str, present: bool, points: u32) {
        if present {
            self.add(name, points);
        }
    }

    fn finish(
        self,
        formula: FormulaId,
        bands: &Bands,
        recommendations: fn(RiskLevel) -> &'static [&'static str],
    ) -> RiskScore {
        let score = self.factors.iter().map(|f| f.points).sum();
        let level = bands.level(score);
        RiskScore {
            formula,
            score,
            level,
            factors: self.factors,
            recommendations: recommendations(level)
                .iter()
                .map(|r| r.to_string())
                .collect(),
        }
    }
}

struct Subject {
    age: f64,
    sex: Sex,
    bmi: f64,
}

fn subject(input: &MeasurementInput) -> Result<Subject, ComputeError> {
    let age = positive(input.age_years, "ageYears")?;
    let sex = require(input.sex, "sex")?;
    let weight = positive(input.weight_kg, "weightKg")?;
    let height = positive(input.height_cm, "heightCm")?;
    Ok(Subject {
        age,
        sex,
        bmi: bmi(weight, height),
    })
}

// ============================================================================
// Bone density
// ============================================================================

const BONE_DENSITY_BANDS: Bands = Bands {
    low_max: 2,
    moderate_max: 5,
};

/// Menopause before this age counts as early
const EARLY_MENOPAUSE_AGE: f64 = 45.0;

fn bone_density_recommendations(level: RiskLevel) -> &'static [&'static str] {
    match level {
        RiskLevel::Low => &[
            "Keep up regular weight-bearing exercise",
            "Maintain recommended calcium and vitamin D intake",
        ],
        RiskLevel::Moderate => &[
            "Discuss a bone density (DXA) scan with your doctor",
            "Add resistance and weight-bearing exercise",
            "Review calcium and vitamin D intake",
        ],
        RiskLevel::High => &[
            "Schedule a bone density (DXA) scan",
            "Ask your doctor for a fracture-risk assessment",
            "Stop smoking and limit alcohol",
            "Take steps to prevent falls at home",
        ],
    }
}

pub fn calculate_bone_density_risk(input: &MeasurementInput) -> Result<RiskScore, ComputeError> {
    let s = subject(input)?;
    let mut tally = Tally::default();

    let age_points = match s.age {
        a if a >= 75.0 => 3,
        a if a >= 65.0 => 2,
        a if a >= 50.0 => 1,
        _ => 0,
    };
    tally.add("age", age_points);
    tally.flag("femaleSex", s.sex == Sex::Female, 1);
    tally.flag(
        "earlyMenopause",
        s.sex == Sex::Female
            && input
                .menopause_age
                .is_some_and(|m| m > 0.0 && m < EARLY_MENOPAUSE_AGE),
        2,
    );
    let bmi_points = match s.bmi {
        b if b < 18.5 => 2,
        b if b < 20.0 => 1,
        _ => 0,
    };
    tally.add("lowBmi", bmi_points);
    tally.flag("familyHistory", input.family_history, 2);
    tally.flag("smoking", input.smoker, 1);
    tally.flag("alcohol", input.heavy_alcohol, 1);
    tally.flag("inactivity", !input.physically_active, 1);
    tally.flag("lowCalcium", input.low_calcium_intake, 1);
    tally.flag("lowVitaminD", input.low_vitamin_d_intake, 1);

    Ok(tally.finish(
        FormulaId::BoneDensityRisk,
        &BONE_DENSITY_BANDS,
        bone_density_recommendations,
    ))
}

// ============================================================================
// Diabetes (ADA-style screening test)
// ============================================================================

const DIABETES_BANDS: Bands = Bands {
    low_max: 2,
    moderate_max: 4,
};

fn diabetes_recommendations(level: RiskLevel) -> &'static [&'static str] {
    match level {
        RiskLevel::Low => &[
            "Stay physically active",
            "Keep a balanced diet and healthy weight",
        ],
        RiskLevel::Moderate => &[
            "Aim for at least 150 minutes of activity per week",
            "Reduce refined sugar and processed food",
            "Consider a fasting glucose check at your next visit",
        ],
        RiskLevel::High => &[
            "Ask your doctor for an HbA1c or fasting glucose test",
            "Work toward losing 5-7% of body weight",
            "Aim for at least 150 minutes of activity per week",
            "Monitor blood pressure regularly",
        ],
    }
}

pub fn calculate_diabetes_risk(input: &MeasurementInput) -> Result<RiskScore, ComputeError> {
    let s = subject(input)?;
    let mut tally = Tally::default();

    let age_points = match s.age {
        a if a >= 60.0 => 3,
        a if a >= 50.0 => 2,
        a if a >= 40.0 => 1,
        _ => 0,
    };
    tally.add("age", age_points);
    tally.flag("maleSex", s.sex == Sex::Male, 1);
    tally.flag(
        "gestationalDiabetes",
        s.sex == Sex::Female && input.gestational_diabetes,
        1,
    );
    tally.flag("familyHistory", input.family_history, 1);
    tally.flag("hypertension", input.hypertension, 1);
    tally.flag("inactivity", !input.physically_active, 1);
    let bmi_points = match s.bmi {
        b if b >= 40.0 => 3,
        b if b >= 30.0 => 2,
        b if b >= 25.0 => 1,
        _ => 0,
    };
    tally.add("weight", bmi_points);

    Ok(tally.finish(
        FormulaId::DiabetesRisk,
        &DIABETES_BANDS,
        diabetes_recommendations,
    ))
}

impl From<RiskScore> for FormulaResult {
    fn from(r: RiskScore) -> Self {
        let mut result = FormulaResult::new(r.formula).with_value("score", f64::from(r.score));
        for factor in &r.factors {
            result = result.with_value(&factor.name, f64::from(factor.points));
        }
        result
            .with_classification(r.level.as_str())
            .with_recommendations(r.recommendations)
    }
}
