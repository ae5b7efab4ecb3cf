//! vitalcalc CLI - Command-line interface for the vitalcalc engine
//!
//! Commands:
//! - eval: Evaluate one formula (or every applicable one) against a measurement file
//! - formulas: List formula ids and the fields they need
//! - schema: Print the measurement input, config or classification schema
//! - doctor: Diagnose configuration and environment

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use vitalcalc::classification::{BMI, BODY_FAT_FEMALE, BODY_FAT_MALE};
use vitalcalc::formulas::calorie_burn::MET_TABLE;
use vitalcalc::types::{FormulaId, FormulaResult, MeasurementInput};
use vitalcalc::{
    ComputeError, EvaluatorConfig, MetricEvaluator, ReportEncoder, PRODUCER_NAME,
    VITALCALC_VERSION,
};

/// vitalcalc - Deterministic health-metric calculation engine
#[derive(Parser)]
#[command(name = "vitalcalc")]
#[command(version = VITALCALC_VERSION)]
#[command(about = "Compute body metrics from measurements", long_about = None)]
struct Cli {
    /// Evaluator configuration file (JSON)
    #[arg(long, global = true, env = "VITALCALC_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a formula against a measurement record
    Eval {
        /// Formula id (e.g. bmi, heart-rate-zones), or "all"
        formula: String,

        /// Input file path (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Wrap the result in a report with producer/provenance metadata
        #[arg(long)]
        report: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// List available formulas
    Formulas {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print schema information
    Schema {
        /// Schema to print
        #[arg(value_enum, default_value = "input")]
        schema_type: SchemaType,

        /// Output as JSON schema
        #[arg(long)]
        json_schema: bool,
    },

    /// Diagnose configuration and environment
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Measurement input record
    Input,
    /// Evaluator configuration
    Config,
    /// BMI and body fat classification bands
    Classification,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), VitalCliError> {
    match cli.command {
        Commands::Eval {
            formula,
            input,
            report,
            pretty,
        } => cmd_eval(cli.config.as_deref(), &formula, &input, report, pretty),

        Commands::Formulas { json } => cmd_formulas(json),

        Commands::Schema {
            schema_type,
            json_schema,
        } => cmd_schema(schema_type, json_schema),

        Commands::Doctor { json } => cmd_doctor(cli.config.as_deref(), json),
    }
}

fn load_config(path: Option<&Path>) -> Result<EvaluatorConfig, VitalCliError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading evaluator config");
            let json = fs::read_to_string(path)?;
            Ok(EvaluatorConfig::from_json(&json)?)
        }
        None => Ok(EvaluatorConfig::default()),
    }
}

fn read_input(input: &Path) -> Result<String, VitalCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn cmd_eval(
    config: Option<&Path>,
    formula: &str,
    input: &Path,
    report: bool,
    pretty: bool,
) -> Result<(), VitalCliError> {
    let evaluator = MetricEvaluator::with_config(load_config(config)?)?;
    let measurements = MeasurementInput::from_json(&read_input(input)?)?;

    let results: Vec<FormulaResult> = if formula.eq_ignore_ascii_case("all") {
        let results = evaluator.evaluate_available(&measurements);
        if results.is_empty() {
            return Err(VitalCliError::NothingApplicable);
        }
        results
    } else {
        let id: FormulaId = formula.parse()?;
        vec![evaluator.evaluate(id, &measurements)?]
    };
    debug!(count = results.len(), "evaluation complete");

    let encoder = ReportEncoder::new();
    for result in &results {
        let line = if report {
            encoder.encode_to_json(&measurements, result, pretty)?
        } else if pretty {
            serde_json::to_string_pretty(result)?
        } else {
            serde_json::to_string(result)?
        };
        println!("{line}");
    }

    Ok(())
}

fn cmd_formulas(json: bool) -> Result<(), VitalCliError> {
    let entries: Vec<FormulaEntry> = FormulaId::ALL
        .iter()
        .map(|id| FormulaEntry {
            id: id.as_str(),
            required: id.required_fields(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        println!("Formulas");
        println!("========");
        for entry in &entries {
            println!("  {:<18} {}", entry.id, entry.required.join(", "));
        }
        println!("\nActivities (calorie_burn):");
        for (name, _) in MET_TABLE {
            println!("  {name}");
        }
    }
    Ok(())
}

/// Measurement fields: (name, JSON type, description)
const INPUT_FIELDS: &[(&str, &str, &str)] = &[
    ("weightKg", "number", "Body weight (kg)"),
    ("heightCm", "number", "Height (cm)"),
    ("ageYears", "number", "Age (years)"),
    ("sex", "string", "male | female"),
    ("restingHeartRate", "number", "Resting heart rate (bpm)"),
    ("neckCm", "number", "Neck circumference (cm)"),
    ("waistCm", "number", "Waist circumference (cm)"),
    ("hipCm", "number", "Hip circumference (cm)"),
    ("bodyFatPercent", "number", "Known body fat (%)"),
    ("activityLevel", "string", "sedentary | light | moderate | active | very_active"),
    ("heartRateMethod", "string", "karvonen | standard | tanaka"),
    ("fitnessLevel", "string", "beginner | average | athletic"),
    ("exerciseHours", "number", "Daily exercise (hours)"),
    ("climate", "string", "cold | temperate | hot | hot_humid"),
    ("pregnant", "boolean", "Pregnant"),
    ("breastfeeding", "boolean", "Breastfeeding"),
    ("ill", "boolean", "Currently ill"),
    ("goal", "string", "lose | maintain | gain"),
    ("activity", "string", "Activity name from the MET table"),
    ("intensity", "string", "light | moderate | vigorous"),
    ("durationMinutes", "number", "Activity duration (minutes)"),
    ("menopauseAge", "number", "Age at menopause (years)"),
    ("familyHistory", "boolean", "Family history of the condition"),
    ("smoker", "boolean", "Smokes"),
    ("heavyAlcohol", "boolean", "Drinks heavily"),
    ("physicallyActive", "boolean", "Regularly physically active"),
    ("lowCalciumIntake", "boolean", "Low dietary calcium"),
    ("lowVitaminDIntake", "boolean", "Low dietary vitamin D"),
    ("hypertension", "boolean", "Diagnosed high blood pressure"),
    ("gestationalDiabetes", "boolean", "History of gestational diabetes"),
    ("sunExposure", "string", "adequate | limited | minimal"),
    ("skinTone", "string", "light | medium | dark"),
];

fn cmd_schema(schema_type: SchemaType, json_schema: bool) -> Result<(), VitalCliError> {
    match schema_type {
        SchemaType::Input => {
            if json_schema {
                println!("{}", get_input_json_schema());
            } else {
                println!("Measurement input (camelCase JSON, all fields optional)");
                println!();
                for (name, kind, description) in INPUT_FIELDS {
                    println!("  {name:<20} {kind:<8} {description}");
                }
            }
        }
        SchemaType::Config => {
            // The default config doubles as the documented shape
            println!("{}", EvaluatorConfig::default().to_json()?);
        }
        SchemaType::Classification => {
            let tables = [
                ("bmi", BMI),
                ("bodyFatMale", BODY_FAT_MALE),
                ("bodyFatFemale", BODY_FAT_FEMALE),
            ];
            if json_schema {
                let tables: serde_json::Map<String, serde_json::Value> = tables
                    .iter()
                    .map(|(name, table)| {
                        let bands: Vec<_> = table
                            .bands()
                            .iter()
                            .map(|b| {
                                // Open-ended last band has no upper bound
                                let upper = b.upper_bound.is_finite().then_some(b.upper_bound);
                                serde_json::json!({ "label": b.label, "upperBound": upper })
                            })
                            .collect();
                        (name.to_string(), serde_json::Value::from(bands))
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&tables)?);
            } else {
                for (name, table) in tables {
                    println!("{name}");
                    for b in table.bands() {
                        if b.upper_bound.is_finite() {
                            println!("  < {:<8} {}", b.upper_bound, b.label);
                        } else {
                            println!("  {:<10} {}", "above", b.label);
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

fn get_input_json_schema() -> String {
    let properties: serde_json::Map<String, serde_json::Value> = INPUT_FIELDS
        .iter()
        .map(|(name, kind, description)| {
            (
                name.to_string(),
                serde_json::json!({ "type": kind, "description": description }),
            )
        })
        .collect();

    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "vitalcalc.measurement_input.v1",
        "description": "Measurements consumed by vitalcalc formulas",
        "type": "object",
        "properties": properties
    })
    .to_string()
}

fn cmd_doctor(config: Option<&Path>, json: bool) -> Result<(), VitalCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "vitalcalc_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("vitalcalc version {VITALCALC_VERSION}"),
    });

    // Check config file if provided
    let config_check = match config {
        None => DoctorCheck {
            name: "config".to_string(),
            status: CheckStatus::Ok,
            message: "Using default constants".to_string(),
        },
        Some(path) if !path.exists() => DoctorCheck {
            name: "config".to_string(),
            status: CheckStatus::Error,
            message: format!("Config file {} does not exist", path.display()),
        },
        Some(path) => match load_config(Some(path)) {
            Ok(_) => DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Ok,
                message: format!("Config file {} valid", path.display()),
            },
            Err(e) => DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Error,
                message: CliError::from(e).message,
            },
        },
    };
    checks.push(config_check);

    // Known-answer check: 70 kg / 175 cm is BMI 22.9
    let sample = MeasurementInput {
        weight_kg: Some(70.0),
        height_cm: Some(175.0),
        ..Default::default()
    };
    let self_test = match vitalcalc::evaluate(FormulaId::Bmi, &sample) {
        Ok(result) if result.get("bmi") == Some(22.9) => DoctorCheck {
            name: "self_test".to_string(),
            status: CheckStatus::Ok,
            message: "BMI known-answer test passed".to_string(),
        },
        Ok(result) => DoctorCheck {
            name: "self_test".to_string(),
            status: CheckStatus::Error,
            message: format!("BMI known-answer test returned {:?}", result.get("bmi")),
        },
        Err(e) => DoctorCheck {
            name: "self_test".to_string(),
            status: CheckStatus::Error,
            message: e.to_string(),
        },
    };
    checks.push(self_test);

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Warning,
            message: "stdin is a TTY; pass --input or pipe measurements".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (ready for eval -i -)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: VITALCALC_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("vitalcalc Doctor Report");
        println!("=======================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");
        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(VitalCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Error types

#[derive(Debug)]
enum VitalCliError {
    Io(io::Error),
    Compute(ComputeError),
    Json(serde_json::Error),
    NothingApplicable,
    DoctorFailed,
}

impl From<io::Error> for VitalCliError {
    fn from(e: io::Error) -> Self {
        VitalCliError::Io(e)
    }
}

impl From<ComputeError> for VitalCliError {
    fn from(e: ComputeError) -> Self {
        VitalCliError::Compute(e)
    }
}

impl From<serde_json::Error> for VitalCliError {
    fn from(e: serde_json::Error) -> Self {
        VitalCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<VitalCliError> for CliError {
    fn from(e: VitalCliError) -> Self {
        match e {
            VitalCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            VitalCliError::Compute(e) => compute_error(e),
            VitalCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            VitalCliError::NothingApplicable => CliError {
                code: "NO_RESULTS".to_string(),
                message: "No formula can run on these measurements".to_string(),
                hint: Some("Run 'vitalcalc formulas' to see required fields".to_string()),
            },
            VitalCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

fn compute_error(e: ComputeError) -> CliError {
    let (code, hint) = match &e {
        ComputeError::MissingField(_) | ComputeError::OutOfDomain { .. } => (
            "PRECONDITION_NOT_MET",
            "Run 'vitalcalc formulas' to see required fields",
        ),
        ComputeError::UnknownActivity(_) => (
            "PRECONDITION_NOT_MET",
            "Run 'vitalcalc formulas' for supported activity names",
        ),
        ComputeError::UnknownFormula(_) => {
            ("UNKNOWN_FORMULA", "Run 'vitalcalc formulas' to list formula ids")
        }
        ComputeError::InvalidConfig(_) => (
            "INVALID_CONFIG",
            "Run 'vitalcalc schema config' for the expected shape",
        ),
        ComputeError::JsonError(_) => ("JSON_ERROR", "Check JSON syntax"),
        ComputeError::EncodingError(_) => ("ENCODING_ERROR", "Report this as a bug"),
    };
    CliError {
        code: code.to_string(),
        message: e.to_string(),
        hint: Some(hint.to_string()),
    }
}

// Report types

#[derive(serde::Serialize)]
struct FormulaEntry {
    id: &'static str,
    required: &'static [&'static str],
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
