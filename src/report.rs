//! Report encoding
//!
//! Wraps a [`FormulaResult`] in a self-describing JSON report carrying
//! producer and provenance metadata. The embedded result is untouched, so
//! two reports for the same input differ only in their provenance.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ComputeError;
use crate::types::{FormulaId, FormulaResult, MeasurementInput};
use crate::{PRODUCER_NAME, VITALCALC_VERSION};

/// Current report format version
pub const REPORT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProvenance {
    /// RFC 3339 timestamp of encoding
    pub computed_at_utc: String,
    /// Inputs the formula consumed, as supplied
    pub input: MeasurementInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricReport {
    pub report_version: String,
    pub producer: ReportProducer,
    pub provenance: ReportProvenance,
    pub formula: FormulaId,
    pub result: FormulaResult,
}

/// Encoder for metric reports
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn encode(&self, input: &MeasurementInput, result: &FormulaResult) -> MetricReport {
        MetricReport {
            report_version: REPORT_VERSION.to_string(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: VITALCALC_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            provenance: ReportProvenance {
                computed_at_utc: Utc::now().to_rfc3339(),
                input: input.clone(),
            },
            formula: result.formula,
            result: result.clone(),
        }
    }

    /// Encode to JSON string
    pub fn encode_to_json(
        &self,
        input: &MeasurementInput,
        result: &FormulaResult,
        pretty: bool,
    ) -> Result<String, ComputeError> {
        let report = self.encode(input, result);
        let json = if pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        };
        json.map_err(|e| ComputeError::EncodingError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::evaluate;
    use pretty_assertions::assert_eq;

    fn sample() -> (MeasurementInput, FormulaResult) {
        let input = MeasurementInput {
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            ..Default::default()
        };
        let result = evaluate(FormulaId::Bmi, &input).unwrap();
        (input, result)
    }

    #[test]
    fn test_encode_report() {
        let (input, result) = sample();
        let encoder = ReportEncoder::with_instance_id("test-instance".to_string());
        let report = encoder.encode(&input, &result);

        assert_eq!(report.report_version, REPORT_VERSION);
        assert_eq!(report.producer.name, PRODUCER_NAME);
        assert_eq!(report.producer.instance_id, "test-instance");
        assert_eq!(report.formula, FormulaId::Bmi);
        assert_eq!(report.result, result);
        assert_eq!(report.provenance.input, input);
        assert!(chrono::DateTime::parse_from_rfc3339(&report.provenance.computed_at_utc).is_ok());
    }

    #[test]
    fn test_new_encoders_get_distinct_ids() {
        assert_ne!(ReportEncoder::new().instance_id(), ReportEncoder::new().instance_id());
    }

    #[test]
    fn test_result_stable_across_reports() {
        let (input, result) = sample();
        let encoder = ReportEncoder::new();
        let a: serde_json::Value =
            serde_json::from_str(&encoder.encode_to_json(&input, &result, false).unwrap()).unwrap();
        let b: serde_json::Value =
            serde_json::from_str(&encoder.encode_to_json(&input, &result, true).unwrap()).unwrap();

        assert_eq!(a["result"], b["result"]);
        assert_eq!(a["result"]["values"]["bmi"], 22.9);
        assert_eq!(a["provenance"]["input"]["weightKg"], 70.0);
    }
}
