//! CLI command definitions for the formfield tool
//!
//! Provides Clap-based command definitions and their execution. Every input
//! file may be JSON, YAML or TOML; the format is chosen by extension.

use clap::{Parser, Subcommand};
use formfield_core::codec::ValueCodec;
use formfield_core::{
    DefaultResolver, FieldId, FieldRenderer, FieldValue, FormSchema, InterpreterConfig,
    SubmissionPayload, SubmissionProcessor, Validator,
};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::output::{
    emit, DecodeOutput, DefaultsOutput, OutputFormat, RenderOutput, SubmissionOutput,
};
use super::ExitCode;
use crate::error::CliError;

/// Formfield CLI
///
/// Check submissions against form definitions, print seeded defaults,
/// describe rendered controls and decode stored responses.
#[derive(Parser, Debug)]
#[command(name = "formfield")]
#[command(about = "Formfield - Interpret data-driven form definitions", long_about = None)]
#[command(version)]
pub struct FormfieldCli {
    /// Output verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Interpreter configuration file
    ///
    /// When omitted, settings are read from FORMFIELD_* environment variables.
    #[arg(short, long, global = true, env = "FORMFIELD_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a client submission
    ///
    /// Normalizes and validates every field, the rating and the comment. On
    /// success the encoded response is printed.
    Validate {
        /// Path to the form definition
        #[arg(short, long)]
        schema: PathBuf,

        /// Path to the submission payload
        #[arg(long)]
        submission: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Print the initial value of every field
    Defaults {
        /// Path to the form definition
        #[arg(short, long)]
        schema: PathBuf,

        /// Only list fields that have a default
        #[arg(long)]
        seeded_only: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Describe the control chosen for every field
    ///
    /// Fields without a supplied value show their default.
    Render {
        /// Path to the form definition
        #[arg(short, long)]
        schema: PathBuf,

        /// Path to a field id to value map
        #[arg(long)]
        values: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Decode a stored response against a form definition
    Decode {
        /// Path to the form definition the response was written under
        #[arg(short, long)]
        schema: PathBuf,

        /// Path to the stored response
        #[arg(short, long)]
        response: PathBuf,

        /// Validate the decoded answers again
        #[arg(long)]
        revalidate: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

/// Stored answers, either bare or inside an encoded response
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredAnswers {
    Envelope { answers: BTreeMap<FieldId, String> },
    Bare(BTreeMap<FieldId, String>),
}

impl StoredAnswers {
    fn into_map(self) -> BTreeMap<FieldId, String> {
        match self {
            StoredAnswers::Envelope { answers } => answers,
            StoredAnswers::Bare(answers) => answers,
        }
    }
}

/// Load the interpreter configuration
pub fn load_config(path: Option<&Path>) -> Result<InterpreterConfig, CliError> {
    let Some(path) = path else {
        return Ok(InterpreterConfig::from_env());
    };

    let value = read_document(path)?;
    let config: InterpreterConfig = serde_json::from_value(value).map_err(|e| {
        CliError::invalid_input(format!("Invalid configuration '{}': {}", path.display(), e))
    })?;

    if config.rating_min > config.rating_max {
        return Err(CliError::invalid_input(format!(
            "Invalid configuration '{}': rating_min {} exceeds rating_max {}",
            path.display(),
            config.rating_min,
            config.rating_max
        )));
    }

    tracing::debug!(path = %path.display(), wire_format = %config.wire_format, "Loaded configuration");
    Ok(config)
}

/// Execute the validate command
pub fn execute_validate(
    config: &InterpreterConfig,
    schema: &Path,
    submission: &Path,
    format: OutputFormat,
) -> Result<ExitCode, CliError> {
    let form = load_form(schema)?;
    let payload: SubmissionPayload = serde_json::from_value(read_document(submission)?)
        .map_err(|e| {
            CliError::parse_error(format!(
                "Invalid submission '{}': {}",
                submission.display(),
                e
            ))
        })?;

    let processor = SubmissionProcessor::new(config.clone());
    let output = SubmissionOutput::from_result(&form, processor.process(&form, &payload));
    emit(&output, format)?;

    Ok(ExitCode::from_validation(!output.accepted))
}

/// Execute the defaults command
pub fn execute_defaults(
    schema: &Path,
    seeded_only: bool,
    format: OutputFormat,
) -> Result<ExitCode, CliError> {
    let form = load_form(schema)?;
    let resolver = DefaultResolver::new();
    let values = if seeded_only {
        resolver.seed(&form)
    } else {
        resolver.initial_values(&form)
    };

    emit(&DefaultsOutput::new(&form, values), format)?;
    Ok(ExitCode::Success)
}

/// Execute the render command
pub fn execute_render(
    config: &InterpreterConfig,
    schema: &Path,
    values: Option<&Path>,
    format: OutputFormat,
) -> Result<ExitCode, CliError> {
    let form = load_form(schema)?;
    let supplied: BTreeMap<String, Value> = match values {
        Some(path) => serde_json::from_value(read_document(path)?).map_err(|e| {
            CliError::parse_error(format!("Invalid values '{}': {}", path.display(), e))
        })?,
        None => BTreeMap::new(),
    };

    let codec = ValueCodec::from_config(config);
    let renderer = FieldRenderer::new(codec.clone());
    let mut seeded = DefaultResolver::new().initial_values(&form);

    let mut controls = Vec::with_capacity(form.len());
    for field in &form {
        let value = match supplied.get(field.id.as_str()) {
            Some(raw) => codec.normalize_client(field, Some(raw))?,
            None => seeded
                .remove(&field.id)
                .unwrap_or_else(|| FieldValue::empty(field.shape())),
        };
        controls.push(renderer.render(field, &value));
    }

    emit(&RenderOutput::new(&form, controls), format)?;
    Ok(ExitCode::Success)
}

/// Execute the decode command
pub fn execute_decode(
    config: &InterpreterConfig,
    schema: &Path,
    response: &Path,
    revalidate: bool,
    format: OutputFormat,
) -> Result<ExitCode, CliError> {
    let form = load_form(schema)?;
    let stored: StoredAnswers = serde_json::from_value(read_document(response)?).map_err(|e| {
        CliError::parse_error(format!(
            "Invalid stored response '{}': {}",
            response.display(),
            e
        ))
    })?;

    let processor = SubmissionProcessor::new(config.clone());
    let decoded = processor.decode_response(&form, &stored.into_map());

    let report = revalidate.then(|| Validator::from_config(config).validate_form(&form, &decoded.values));
    let has_errors = report.as_ref().map_or(false, |r| !r.is_valid());

    emit(&DecodeOutput::new(&form, decoded, report), format)?;
    Ok(ExitCode::from_validation(has_errors))
}

/// Load and parse a form definition
fn load_form(path: &Path) -> Result<FormSchema, CliError> {
    let value = read_document(path)?;
    let form = FormSchema::from_value(value)?;
    tracing::debug!(
        path = %path.display(),
        version = form.version,
        fields = form.len(),
        "Loaded form definition"
    );
    Ok(form)
}

/// Read a document file into a JSON value
fn read_document(path: &Path) -> Result<Value, CliError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CliError::file_error(format!("Failed to read '{}': {}", path.display(), e))
    })?;
    parse_document(path, &content)
}

/// Parse a document based on its extension
pub fn parse_document(path: &Path, content: &str) -> Result<Value, CliError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "json" => serde_json::from_str(content)
            .map_err(|e| CliError::parse_error(format!("Invalid JSON: {}", e))),
        "yaml" | "yml" => serde_yaml::from_str(content)
            .map_err(|e| CliError::parse_error(format!("Invalid YAML: {}", e))),
        "toml" => {
            let toml_value: toml::Value = toml::from_str(content)
                .map_err(|e| CliError::parse_error(format!("Invalid TOML: {}", e)))?;
            serde_json::to_value(toml_value)
                .map_err(|e| CliError::parse_error(format!("Conversion error: {}", e)))
        }
        _ => Err(CliError::invalid_input(format!(
            "Unsupported file format: {}. Supported formats: json, yaml, yml, toml",
            extension
        ))),
    }
}
