//! Formfield CLI
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Validation failed
//! - 3: Invalid input or arguments
//! - 4: File not found or inaccessible
//! - 5: Form definition errors
//! - 10: Internal error

use clap::Parser;
use formfield_cli::{logging, run_cli, FormfieldCli};

fn main() {
    let cli = FormfieldCli::parse();

    if let Err(e) = logging::init(cli.verbose, cli.log_json) {
        eprintln!("Warning: logging unavailable: {}", e);
    }

    let exit_code = run_cli(cli);
    std::process::exit(exit_code.into());
}
