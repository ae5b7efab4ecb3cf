//! Evaluation entry points
//!
//! This module provides the public API for vitalcalc. It maps a formula
//! identifier and a measurement record to a [`FormulaResult`], or declines
//! when the record does not yet satisfy the formula's preconditions.

use tracing::debug;

use crate::config::EvaluatorConfig;
use crate::error::ComputeError;
use crate::formulas;
use crate::types::{FormulaId, FormulaResult, MeasurementInput};

/// Evaluate a formula with the default configuration.
///
/// # Arguments
/// * `formula` - Which calculator to run
/// * `input` - The user's measurements
///
/// # Example
/// ```ignore
/// let input = MeasurementInput { weight_kg: Some(70.0), height_cm: Some(175.0), ..Default::default() };
/// let result = evaluate(FormulaId::Bmi, &input)?;
/// assert_eq!(result.get("bmi"), Some(22.9));
/// ```
pub fn evaluate(formula: FormulaId, input: &MeasurementInput) -> Result<FormulaResult, ComputeError> {
    run(formula, input, &EvaluatorConfig::default())
}

/// Evaluate a formula named by string against a JSON measurement record,
/// returning the result as JSON.
///
/// # Arguments
/// * `formula` - Formula id, e.g. `"bmi"` or `"heart-rate-zones"`
/// * `input_json` - camelCase measurement record
pub fn evaluate_json(formula: &str, input_json: &str) -> Result<String, ComputeError> {
    MetricEvaluator::new().evaluate_json(formula, input_json)
}

fn run(
    formula: FormulaId,
    input: &MeasurementInput,
    config: &EvaluatorConfig,
) -> Result<FormulaResult, ComputeError> {
    debug!(%formula, "evaluating formula");

    let result = match formula {
        FormulaId::Bmi => formulas::calculate_bmi(input).map(FormulaResult::from),
        FormulaId::Bmr => {
            formulas::calculate_bmr(input, &config.activity_factors).map(FormulaResult::from)
        }
        FormulaId::BodyFat => formulas::calculate_body_fat(input).map(FormulaResult::from),
        FormulaId::HeartRateZones => {
            formulas::calculate_heart_rate_zones(input).map(FormulaResult::from)
        }
        FormulaId::WaterIntake => {
            formulas::calculate_water_intake(input, &config.water).map(FormulaResult::from)
        }
        FormulaId::Macros => formulas::calculate_macros(input, config).map(FormulaResult::from),
        FormulaId::IdealWeight => formulas::calculate_ideal_weight(input).map(FormulaResult::from),
        FormulaId::CalorieBurn => formulas::calculate_calorie_burn(input).map(FormulaResult::from),
        FormulaId::BoneDensityRisk => {
            formulas::calculate_bone_density_risk(input).map(FormulaResult::from)
        }
        FormulaId::DiabetesRisk => formulas::calculate_diabetes_risk(input).map(FormulaResult::from),
        FormulaId::VitaminD => formulas::calculate_vitamin_d(input).map(FormulaResult::from),
    };

    if let Err(e) = &result {
        debug!(%formula, error = %e, "formula declined");
    }
    result
}

/// Evaluator bound to a specific configuration.
///
/// Holds no per-evaluation state: the same input always yields the same
/// result.
#[derive(Debug, Clone, Default)]
pub struct MetricEvaluator {
    config: EvaluatorConfig,
}

impl MetricEvaluator {
    /// Create an evaluator with the published default constants
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an evaluator with custom constants
    pub fn with_config(config: EvaluatorConfig) -> Result<Self, ComputeError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create an evaluator from a JSON configuration document
    pub fn from_config_json(json: &str) -> Result<Self, ComputeError> {
        Ok(Self {
            config: EvaluatorConfig::from_json(json)?,
        })
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluate a formula, reporting why it declined if preconditions fail
    pub fn evaluate(
        &self,
        formula: FormulaId,
        input: &MeasurementInput,
    ) -> Result<FormulaResult, ComputeError> {
        run(formula, input, &self.config)
    }

    /// Evaluate a formula, yielding nothing until the input is complete
    pub fn try_evaluate(&self, formula: FormulaId, input: &MeasurementInput) -> Option<FormulaResult> {
        self.evaluate(formula, input).ok()
    }

    /// Every formula whose preconditions the input already satisfies
    pub fn evaluate_available(&self, input: &MeasurementInput) -> Vec<FormulaResult> {
        FormulaId::ALL
            .iter()
            .filter_map(|&formula| self.try_evaluate(formula, input))
            .collect()
    }

    /// JSON in, JSON out
    pub fn evaluate_json(&self, formula: &str, input_json: &str) -> Result<String, ComputeError> {
        let formula: FormulaId = formula.parse()?;
        let input = MeasurementInput::from_json(input_json)?;
        let result = self.evaluate(formula, &input)?;
        serde_json::to_string(&result).map_err(|e| ComputeError::EncodingError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ActivityLevel, Goal, Sex};
    use pretty_assertions::assert_eq;

    fn full_input() -> MeasurementInput {
        MeasurementInput {
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            age_years: Some(30.0),
            sex: Some(Sex::Male),
            resting_heart_rate: Some(60.0),
            neck_cm: Some(38.0),
            waist_cm: Some(85.0),
            activity_level: Some(ActivityLevel::Moderate),
            goal: Some(Goal::Maintain),
            ..Default::default()
        }
    }

    #[test]
    fn test_evaluate_bmi() {
        let input = MeasurementInput {
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            ..Default::default()
        };
        let result = evaluate(FormulaId::Bmi, &input).unwrap();
        assert_eq!(result.get("bmi"), Some(22.9));
        assert_eq!(result.classification.as_deref(), Some("normal"));
    }

    #[test]
    fn test_try_evaluate_declines_incomplete_input() {
        let evaluator = MetricEvaluator::new();
        let input = MeasurementInput {
            weight_kg: Some(70.0),
            ..Default::default()
        };
        assert_eq!(evaluator.try_evaluate(FormulaId::Bmi, &input), None);
    }

    #[test]
    fn test_repeated_evaluation_is_identical() {
        let evaluator = MetricEvaluator::new();
        let input = full_input();
        for formula in [
            FormulaId::Bmi,
            FormulaId::Bmr,
            FormulaId::BodyFat,
            FormulaId::HeartRateZones,
            FormulaId::WaterIntake,
            FormulaId::Macros,
            FormulaId::IdealWeight,
        ] {
            let first = serde_json::to_string(&evaluator.evaluate(formula, &input).unwrap()).unwrap();
            let second = serde_json::to_string(&evaluator.evaluate(formula, &input).unwrap()).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_evaluate_available_skips_unmet_formulas() {
        let results = MetricEvaluator::new().evaluate_available(&full_input());
        let ids: Vec<FormulaId> = results.iter().map(|r| r.formula).collect();

        assert!(ids.contains(&FormulaId::Bmi));
        assert!(ids.contains(&FormulaId::Macros));
        assert!(ids.contains(&FormulaId::DiabetesRisk));
        // No activity / duration supplied
        assert!(!ids.contains(&FormulaId::CalorieBurn));
    }

    #[test]
    fn test_evaluate_json() {
        let json = evaluate_json("bmi", r#"{"weightKg": 70, "heightCm": 175}"#).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["formula"], "bmi");
        assert_eq!(value["values"]["bmi"], 22.9);
    }

    #[test]
    fn test_evaluate_json_errors() {
        assert!(matches!(
            evaluate_json("astrology", "{}"),
            Err(ComputeError::UnknownFormula(_))
        ));
        assert!(matches!(
            evaluate_json("bmi", "not json"),
            Err(ComputeError::JsonError(_))
        ));
        let err = evaluate_json("bmi", "{}").unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn test_custom_config_reaches_formulas() {
        let evaluator =
            MetricEvaluator::from_config_json(r#"{"goal_adjustment_kcal": 250}"#).unwrap();
        let mut input = full_input();
        input.goal = Some(Goal::Lose);
        let result = evaluator.evaluate(FormulaId::Macros, &input).unwrap();
        assert_eq!(result.get("targetCalories"), Some(2378.0));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = EvaluatorConfig::default();
        config.macro_split.fat = 0.9;
        assert!(matches!(
            MetricEvaluator::with_config(config),
            Err(ComputeError::InvalidConfig(_))
        ));
    }
}
