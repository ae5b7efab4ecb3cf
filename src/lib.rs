//! vitalcalc - Deterministic health-metric calculation engine
//!
//! vitalcalc turns a set of body measurements into derived metrics through
//! pure functions: formula id + measurements → values, classification and
//! recommendations. A formula whose inputs are incomplete or out of range
//! yields no result instead of a partial one.
//!
//! ## Modules
//!
//! - **Formulas**: BMI, BMR/TDEE, body fat, heart-rate zones, water intake,
//!   macros, ideal weight, MET calorie burn, risk scores, vitamin D
//! - **Evaluator**: dispatch by [`FormulaId`] with configurable constants
//! - **Report**: JSON reports with producer/provenance metadata

pub mod classification;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod formulas;
pub mod report;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use config::EvaluatorConfig;
pub use error::ComputeError;
pub use evaluator::{evaluate, evaluate_json, MetricEvaluator};
pub use report::{MetricReport, ReportEncoder};
pub use types::{FormulaId, FormulaResult, MeasurementInput};

/// vitalcalc version embedded in all reports
pub const VITALCALC_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "vitalcalc";
