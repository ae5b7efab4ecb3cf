//! Evaluator configuration
//!
//! The tunable constant tables shared by several formulas. Defaults carry
//! the published values; a deployment may override them from JSON.

use serde::{Deserialize, Serialize};

use crate::error::ComputeError;
use crate::types::{ActivityLevel, Goal};

/// TDEE multipliers by activity level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityFactors {
    pub sedentary: f64,
    pub light: f64,
    pub moderate: f64,
    pub active: f64,
    pub very_active: f64,
}

impl Default for ActivityFactors {
    fn default() -> Self {
        Self {
            sedentary: 1.2,
            light: 1.375,
            moderate: 1.55,
            active: 1.725,
            very_active: 1.9,
        }
    }
}

impl ActivityFactors {
    pub fn factor(&self, level: ActivityLevel) -> f64 {
        match level {
            ActivityLevel::Sedentary => self.sedentary,
            ActivityLevel::Light => self.light,
            ActivityLevel::Moderate => self.moderate,
            ActivityLevel::Active => self.active,
            ActivityLevel::VeryActive => self.very_active,
        }
    }

    fn all(&self) -> [f64; 5] {
        [
            self.sedentary,
            self.light,
            self.moderate,
            self.active,
            self.very_active,
        ]
    }
}

/// Fraction of target calories per macronutrient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroSplit {
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

impl Default for MacroSplit {
    fn default() -> Self {
        Self {
            protein: 0.25,
            fat: 0.30,
            carbs: 0.45,
        }
    }
}

/// Hydration constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterConfig {
    /// Baseline intake per kg of body weight (mL)
    pub ml_per_kg: f64,
    /// Additional intake per hour of exercise (mL)
    pub exercise_ml_per_hour: f64,
    /// Activity multipliers, indexed like `ActivityFactors`
    pub activity_multipliers: ActivityFactors,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            ml_per_kg: 35.0,
            exercise_ml_per_hour: 625.0,
            activity_multipliers: ActivityFactors {
                sedentary: 0.9,
                light: 1.0,
                moderate: 1.1,
                active: 1.2,
                very_active: 1.3,
            },
        }
    }
}

/// Full evaluator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    pub activity_factors: ActivityFactors,
    pub macro_split: MacroSplit,
    /// Daily calorie delta applied for lose / gain goals (kcal)
    pub goal_adjustment_kcal: f64,
    pub water: WaterConfig,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            activity_factors: ActivityFactors::default(),
            macro_split: MacroSplit::default(),
            goal_adjustment_kcal: 500.0,
            water: WaterConfig::default(),
        }
    }
}

impl EvaluatorConfig {
    /// Load configuration from JSON; missing sections fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, ComputeError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ComputeError> {
        serde_json::to_string_pretty(self).map_err(ComputeError::JsonError)
    }

    /// Check the tables are usable
    pub fn validate(&self) -> Result<(), ComputeError> {
        let factors = self
            .activity_factors
            .all()
            .into_iter()
            .chain(self.water.activity_multipliers.all());
        for factor in factors {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(ComputeError::InvalidConfig(format!(
                    "activity multiplier must be positive, got {factor}"
                )));
            }
        }

        let split = &self.macro_split;
        let parts = [split.protein, split.fat, split.carbs];
        if parts.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(ComputeError::InvalidConfig(
                "macro fractions must be non-negative".to_string(),
            ));
        }
        let total: f64 = parts.iter().sum();
        if (total - 1.0).abs() > 1e-6 {
            return Err(ComputeError::InvalidConfig(format!(
                "macro fractions must sum to 1, got {total}"
            )));
        }

        if !self.goal_adjustment_kcal.is_finite() || self.goal_adjustment_kcal < 0.0 {
            return Err(ComputeError::InvalidConfig(
                "goal adjustment must be non-negative".to_string(),
            ));
        }

        let water = &self.water;
        let ml_per_kg_ok = water.ml_per_kg.is_finite() && water.ml_per_kg > 0.0;
        let exercise_ok =
            water.exercise_ml_per_hour.is_finite() && water.exercise_ml_per_hour >= 0.0;
        if !ml_per_kg_ok || !exercise_ok {
            return Err(ComputeError::InvalidConfig(
                "water constants must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Calorie delta for a goal
    pub fn goal_delta(&self, goal: Goal) -> f64 {
        match goal {
            Goal::Lose => -self.goal_adjustment_kcal,
            Goal::Maintain => 0.0,
            Goal::Gain => self.goal_adjustment_kcal,
        }
    }
}
