//! Formfield CLI
//!
//! Command-line surface over `formfield-core` for form authors and operators.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Check a client submission against a form definition
//! formfield validate --schema form.json --submission payload.json
//!
//! # Print the initial value of every field
//! formfield defaults --schema form.yaml --format json
//!
//! # Describe the controls a UI layer should present
//! formfield render --schema form.json --values draft.json
//!
//! # Decode a stored response against the form version it was written under
//! formfield decode --schema form-v1.json --response stored.json --revalidate
//! ```
//!
//! Interpreter settings come from `--config <file>` or, when absent, from
//! `FORMFIELD_*` environment variables.

pub mod cli;
pub mod error;
pub mod logging;

pub use cli::{Commands, ExitCode, FormfieldCli, OutputFormat};
pub use error::CliError;

/// Run the CLI and map any failure to an exit code
pub fn run_cli(cli: FormfieldCli) -> ExitCode {
    match cli::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            tracing::debug!(error = ?e, "Command failed");
            ExitCode::from_error(&e)
        }
    }
}
