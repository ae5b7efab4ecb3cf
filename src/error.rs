//! Error types for vitalcalc

use thiserror::Error;

/// Errors that can occur during evaluation
///
/// Formula evaluation has a single failure family: a precondition on the
/// input was not met. `MissingField`, `OutOfDomain` and `UnknownActivity`
/// belong to that family; the remaining variants only arise at the library
/// edges (configuration, JSON, dispatch by name).
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Field {field} out of domain: {reason}")]
    OutOfDomain { field: String, reason: String },

    #[error("Unknown activity: {0}")]
    UnknownActivity(String),

    #[error("Unknown formula: {0}")]
    UnknownFormula(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

impl ComputeError {
    pub(crate) fn missing(field: &str) -> Self {
        ComputeError::MissingField(field.to_string())
    }

    pub(crate) fn out_of_domain(field: &str, reason: impl Into<String>) -> Self {
        ComputeError::OutOfDomain {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// True when the error means "inputs not yet valid" rather than a fault
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            ComputeError::MissingField(_)
                | ComputeError::OutOfDomain { .. }
                | ComputeError::UnknownActivity(_)
        )
    }
}
