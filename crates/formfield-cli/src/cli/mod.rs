//! CLI module for the formfield tool
//!
//! This module provides command-line functionality for checking submissions
//! against a form definition, printing seeded defaults, describing rendered
//! controls and decoding stored responses.

pub mod commands;
pub mod output;

pub use commands::{Commands, FormfieldCli};
pub use output::OutputFormat;

use crate::error::CliError;

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful execution
    Success = 0,
    /// The submission or stored response failed validation
    ValidationFailed = 1,
    /// Invalid input or arguments
    InvalidInput = 3,
    /// File not found or inaccessible
    FileError = 4,
    /// Form definition errors
    SchemaError = 5,
    /// Internal error
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl ExitCode {
    /// Determine exit code from a validation outcome
    pub fn from_validation(has_errors: bool) -> Self {
        if has_errors {
            ExitCode::ValidationFailed
        } else {
            ExitCode::Success
        }
    }

    /// Determine exit code for a failed command
    pub fn from_error(err: &CliError) -> Self {
        match err {
            CliError::FileError(_) => ExitCode::FileError,
            e if e.is_schema_error() => ExitCode::SchemaError,
            e if e.is_user_error() => ExitCode::InvalidInput,
            _ => ExitCode::InternalError,
        }
    }
}

/// Run the CLI with the given arguments and return the exit code
pub fn run(cli: FormfieldCli) -> Result<ExitCode, CliError> {
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Validate {
            schema,
            submission,
            format,
        } => commands::execute_validate(&config, &schema, &submission, format),
        Commands::Defaults {
            schema,
            seeded_only,
            format,
        } => commands::execute_defaults(&schema, seeded_only, format),
        Commands::Render {
            schema,
            values,
            format,
        } => commands::execute_render(&config, &schema, values.as_deref(), format),
        Commands::Decode {
            schema,
            response,
            revalidate,
            format,
        } => commands::execute_decode(&config, &schema, &response, revalidate, format),
    }
}
